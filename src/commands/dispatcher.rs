use super::{
    AssistantState, Command,
    analysis::{
        AnalyzeCodeCommand, AnalyzeSelfCommand, DuplicatesCommand, FileTypesCommand,
        LargeFilesCommand,
    },
    handler::{
        BrowseCommand, ChatCommand, CheckUpdatesCommand, HelloCommand, HelpCommand,
        MonitorCommand, OpenCommand, ResetChatCommand, RunCommand, ScheduleCommand, ShellCommand,
        SystemCommand,
    },
    integrations::{
        AddEventCommand, ListEventsCommand, NewsCommand, SendEmailCommand, WeatherCommand,
    },
    plugin::{DisablePluginCommand, EnablePluginCommand, ListPluginsCommand},
    registry::CommandRegistry,
};
use crate::core::error::{AssistantError, panic_text};
use crate::nlp;

use futures::FutureExt;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Shown in place of the result when a handler panics.
pub const PANIC_MESSAGE: &str = "Sorry, something went wrong while processing your command.";

type Outcome = Result<Result<String, AssistantError>, Box<dyn Any + Send>>;

/// Routes canonical commands to built-in handlers or plugin commands.
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    /// Runs one command and returns the text to show. Never fails: handler
    /// errors and panics become display text. `command` is appended to the
    /// session's command history either way.
    pub async fn dispatch(&self, state: &mut AssistantState, command: &str) -> String {
        let parsed = Command::parse(command);
        let action = parsed.action.as_str();
        tracing::info!(action, "dispatching command");

        let outcome: Option<Outcome> = match self.registry.get(action) {
            Some(handler) => Some(
                AssertUnwindSafe(handler.execute(state, parsed.argument))
                    .catch_unwind()
                    .await,
            ),
            None => state.plugins.find_command(action).map(|(name, plugin)| {
                tracing::debug!(plugin = name, action, "routing to plugin");
                panic::catch_unwind(AssertUnwindSafe(|| {
                    plugin.run_command(action, parsed.argument)
                }))
            }),
        };

        let text = match outcome {
            Some(Ok(Ok(text))) => text,
            Some(Ok(Err(e))) => {
                tracing::warn!(action, kind = ?e.kind(), "command failed: {}", e);
                e.user_message()
            }
            Some(Err(payload)) => {
                tracing::error!(action, "command panicked: {}", panic_text(payload.as_ref()));
                PANIC_MESSAGE.to_string()
            }
            None => {
                tracing::warn!(action, "unknown command");
                format!("Unknown command: {}", command)
            }
        };

        state.session.record_command(command);
        text
    }

    /// Built-in or plugin action.
    pub fn is_known_action(&self, state: &AssistantState, action: &str) -> bool {
        self.registry.contains(action) || state.plugins.find_command(action).is_some()
    }

    /// The canonical command for raw user input. Input that already starts
    /// with a known action passes through untouched.
    pub fn interpret(&self, state: &AssistantState, input: &str, use_nlp: bool) -> String {
        let input = input.trim();
        let first = Command::parse(input).action;
        if !use_nlp || self.is_known_action(state, &first) {
            input.to_string()
        } else {
            let command = nlp::normalize(input);
            tracing::debug!(input, command = %command, "normalized input");
            command
        }
    }

    /// `interpret` then `dispatch`. Returns the command that ran and its result.
    pub async fn submit(
        &self,
        state: &mut AssistantState,
        input: &str,
        use_nlp: bool,
    ) -> (String, String) {
        let command = self.interpret(state, input, use_nlp);
        let result = self.dispatch(state, &command).await;
        (command, result)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("hello", HelloCommand);
    registry.register("reset_chat", ResetChatCommand);
    registry.register("open", OpenCommand);
    registry.register("run", RunCommand);
    registry.register("browse", BrowseCommand);
    registry.register("shell", ShellCommand);
    registry.register("chat", ChatCommand);
    registry.register("system", SystemCommand);
    registry.register("monitor", MonitorCommand);
    registry.register("schedule", ScheduleCommand);
    registry.register("weather", WeatherCommand);
    registry.register("list_events", ListEventsCommand);
    registry.register("add_event", AddEventCommand);
    registry.register("send_email", SendEmailCommand);
    registry.register("news", NewsCommand);
    registry.register("large_files", LargeFilesCommand);
    registry.register("duplicates", DuplicatesCommand);
    registry.register("file_types", FileTypesCommand);
    registry.register("analyze_code", AnalyzeCodeCommand);
    registry.register("analyze_self", AnalyzeSelfCommand);
    registry.register("list_plugins", ListPluginsCommand);
    registry.register("enable_plugin", EnablePluginCommand);
    registry.register("disable_plugin", DisablePluginCommand);
    registry.register("check_updates", CheckUpdatesCommand);

    let help = HelpCommand::new(registry.help_lines());
    registry.register("help", help);

    CommandDispatcher::new(Arc::new(registry))
}
