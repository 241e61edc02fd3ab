mod common;

use async_trait::async_trait;
use beye::commands::dispatcher::PANIC_MESSAGE;
use beye::commands::handler::CommandHandler;
use beye::commands::registry::CommandRegistry;
use beye::commands::{AssistantState, CommandDispatcher, create_command_registry};
use beye::core::error::AssistantError;
use beye::providers::Role;
use beye::services::updates::CURRENT_VERSION;
use common::test_state;
use std::fs;
use std::sync::Arc;

struct PanickingCommand;

#[async_trait]
impl CommandHandler for PanickingCommand {
    async fn execute(
        &self,
        _state: &mut AssistantState,
        _argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        panic!("handler bug")
    }

    fn help(&self) -> &'static str {
        "boom - Always panics."
    }
}

#[tokio::test]
async fn unknown_command_is_reported_and_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    let result = dispatcher.dispatch(&mut state, "teleport home").await;

    assert_eq!(result, "Unknown command: teleport home");
    assert_eq!(state.session.command_history(), ["teleport home"]);
}

#[tokio::test]
async fn malformed_numeric_argument_becomes_text() {
    let plugin_dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(plugin_dir.path(), &[], None);
    let dispatcher = create_command_registry();
    let command = format!("large_files {},abc", data_dir.path().display());

    let result = dispatcher.dispatch(&mut state, &command).await;

    assert_eq!(
        result,
        "Error: Size limit 'abc' is not a whole number of megabytes."
    );
    assert_eq!(state.session.command_history(), [command]);
}

#[tokio::test]
async fn panicking_handler_yields_apology() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let mut registry = CommandRegistry::new();
    registry.register("boom", PanickingCommand);
    let dispatcher = CommandDispatcher::new(Arc::new(registry));

    let result = dispatcher.dispatch(&mut state, "boom now").await;

    assert_eq!(result, PANIC_MESSAGE);
    assert_eq!(state.session.command_history(), ["boom now"]);
}

#[tokio::test]
async fn panicking_plugin_command_yields_apology() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[("volatile.plug", "volatile")], None);
    let dispatcher = create_command_registry();

    let result = dispatcher.dispatch(&mut state, "explode").await;

    assert_eq!(result, PANIC_MESSAGE);
    assert_eq!(state.session.command_history().len(), 1);
    assert!(state.plugins.get("volatile").is_some());
}

#[tokio::test]
async fn plugin_commands_are_routed() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[("greeter.plug", "greeter")], None);
    let dispatcher = create_command_registry();

    assert_eq!(dispatcher.dispatch(&mut state, "greet Ada").await, "hi Ada");
    assert_eq!(
        dispatcher.dispatch(&mut state, "list_plugins").await,
        "Installed Plugins:\ngreeter - says hello"
    );
}

#[tokio::test]
async fn disabled_plugin_stops_routing() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[("greeter.plug", "greeter")], None);
    let dispatcher = create_command_registry();

    assert_eq!(
        dispatcher.dispatch(&mut state, "enable_plugin greeter").await,
        "Plugin 'greeter' enabled."
    );
    assert_eq!(
        dispatcher.dispatch(&mut state, "disable_plugin greeter").await,
        "Plugin 'greeter' disabled."
    );
    assert_eq!(
        dispatcher.dispatch(&mut state, "greet Ada").await,
        "Unknown command: greet Ada"
    );
    assert_eq!(state.session.command_history().len(), 3);
}

#[tokio::test]
async fn disabling_unknown_plugin_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    let result = dispatcher.dispatch(&mut state, "disable_plugin ghost").await;

    assert_eq!(result, "Plugin 'ghost' not found.");
    assert_eq!(state.session.command_history(), ["disable_plugin ghost"]);
}

#[tokio::test]
async fn chat_appends_both_turns() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, recorded) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    assert_eq!(dispatcher.dispatch(&mut state, "chat hi").await, "reply to 1 turns");
    assert_eq!(dispatcher.dispatch(&mut state, "chat again").await, "reply to 3 turns");

    let turns = state.session.turns();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].content, "hi");
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(recorded.chat_calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn failed_chat_keeps_the_user_turn() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], Some("slow down"));
    let dispatcher = create_command_registry();

    let result = dispatcher.dispatch(&mut state, "chat hello?").await;

    assert_eq!(result, "Error: Rate limit exceeded - slow down");
    assert_eq!(state.session.turns().len(), 1);
    assert_eq!(state.session.turns()[0].role, Role::User);
}

#[tokio::test]
async fn reset_chat_keeps_command_history() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    dispatcher.dispatch(&mut state, "hello").await;
    dispatcher.dispatch(&mut state, "chat hi").await;
    let result = dispatcher.dispatch(&mut state, "reset_chat").await;

    assert_eq!(result, "Chat conversation history reset.");
    assert!(state.session.turns().is_empty());
    assert_eq!(
        state.session.command_history(),
        ["hello", "chat hi", "reset_chat"]
    );
}

#[tokio::test]
async fn added_event_is_listed() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    assert_eq!(
        dispatcher.dispatch(&mut state, "list_events").await,
        "No upcoming events found."
    );
    let created = dispatcher
        .dispatch(
            &mut state,
            "add_event Standup,2025-01-01T09:00:00Z,2025-01-01T09:15:00Z",
        )
        .await;
    assert_eq!(created, "Event created: Standup");

    let listed = dispatcher.dispatch(&mut state, "list_events").await;
    assert_eq!(listed, "Upcoming events:\n2025-01-01T09:00:00Z - Standup");
}

#[tokio::test]
async fn email_body_may_contain_commas() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, recorded) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    let result = dispatcher
        .dispatch(
            &mut state,
            "send_email me@example.com,secret,bob@example.com,Lunch,Hi, Bob, see you",
        )
        .await;

    assert_eq!(result, "Email sent successfully to bob@example.com.");
    let sent = recorded.mail.lock().unwrap();
    assert_eq!(sent[0].subject, "Lunch");
    assert_eq!(sent[0].body, "Hi, Bob, see you");
}

#[tokio::test]
async fn incomplete_email_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, recorded) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    let result = dispatcher.dispatch(&mut state, "send_email me@example.com").await;

    assert!(result.starts_with("Error: Usage: send_email"));
    assert!(recorded.mail.lock().unwrap().is_empty());
}

#[tokio::test]
async fn news_defaults_to_general() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, recorded) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    let result = dispatcher.dispatch(&mut state, "news").await;

    assert_eq!(recorded.news_topics.lock().unwrap().as_slice(), ["general"]);
    assert!(result.starts_with("Latest News:\n- general story 1 (Wire)"));
    assert_eq!(result.lines().count(), 6);
}

#[tokio::test]
async fn weather_report_is_formatted() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    let result = dispatcher.dispatch(&mut state, "weather paris").await;

    assert_eq!(
        result,
        "Weather in Paris:\n- Condition: Clear sky\n- Temperature: 21.5°C\n- Humidity: 40%\n- Wind Speed: 3.2 m/s"
    );
    assert_eq!(
        dispatcher.dispatch(&mut state, "weather").await,
        "Error: Please provide a location for the weather report."
    );
}

#[tokio::test]
async fn help_lists_builtins_and_plugin_commands() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[("greeter.plug", "greeter")], None);
    let dispatcher = create_command_registry();

    let help = dispatcher.dispatch(&mut state, "help").await;

    assert!(help.starts_with("Available Commands:\n1. hello - Greets the user."));
    assert!(help.contains("\n25. help - Displays this list of commands."));
    assert!(help.ends_with("Plugin Commands:\n- greet (greeter)"));
}

#[tokio::test]
async fn check_updates_compares_with_running_version() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    let result = dispatcher.dispatch(&mut state, "check_updates").await;

    assert_eq!(
        result,
        format!("Update available: v9.9.9 (running {}).", CURRENT_VERSION)
    );
}

#[tokio::test]
async fn monitor_rejects_bad_thresholds() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    let result = dispatcher.dispatch(&mut state, "monitor cpu=lots").await;

    assert_eq!(result, "Error: Threshold for 'cpu' is not a number.");
}

#[tokio::test]
async fn file_commands_walk_directories() {
    let plugin_dir = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    fs::write(data.path().join("a.txt"), "same").unwrap();
    fs::write(data.path().join("b.txt"), "same").unwrap();
    fs::write(data.path().join("c.md"), "other").unwrap();
    let (mut state, _) = test_state(plugin_dir.path(), &[], None);
    let dispatcher = create_command_registry();
    let root = data.path().display();

    assert_eq!(
        dispatcher.dispatch(&mut state, &format!("duplicates {}", root)).await,
        data.path().join("b.txt").display().to_string()
    );
    assert_eq!(
        dispatcher
            .dispatch(&mut state, &format!("file_types {},md;rs", root))
            .await,
        data.path().join("c.md").display().to_string()
    );
    assert_eq!(
        dispatcher
            .dispatch(&mut state, &format!("large_files {},1", root))
            .await,
        "No large files found."
    );
}

#[tokio::test]
async fn analyze_code_reports_findings() {
    let plugin_dir = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    let source = data.path().join("lib.rs");
    fs::write(&source, "fn main() {\n    loop {}\n}\n").unwrap();
    let (mut state, _) = test_state(plugin_dir.path(), &[], None);
    let dispatcher = create_command_registry();

    let result = dispatcher
        .dispatch(&mut state, &format!("analyze_code {}", source.display()))
        .await;

    assert_eq!(
        result,
        "The code has the following issues:\nLine 2: 'loop' has no body."
    );
}

#[tokio::test]
async fn analyze_self_covers_the_crate() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    let result = dispatcher.dispatch(&mut state, "analyze_self").await;

    assert!(result.starts_with("Analyzed "));
    assert!(!result.contains("Syntax Error"));
}

#[cfg(unix)]
#[tokio::test]
async fn shell_runs_through_detected_shell() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    assert_eq!(dispatcher.dispatch(&mut state, "shell echo hi").await, "hi");
    assert_eq!(
        dispatcher.dispatch(&mut state, "shell exit 4").await,
        "Command exited with status 4"
    );
}

#[tokio::test]
async fn schedule_validates_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    assert_eq!(
        dispatcher.dispatch(&mut state, "schedule true,0").await,
        "Task 'true' scheduled to run in 0 seconds."
    );
    assert!(
        dispatcher
            .dispatch(&mut state, "schedule true,later")
            .await
            .starts_with("Error: Delay 'later'")
    );
}
