mod common;

use beye::commands::create_command_registry;
use beye::nlp::normalize;
use common::test_state;

#[test]
fn weather_phrasing_normalizes_to_a_fixed_point() {
    let inputs = [
        "weather Paris",
        "What's the weather like in Paris",
        "tell me the weather for tomorrow in Rome",
    ];
    for input in inputs {
        let command = normalize(input);
        assert!(command.starts_with("weather "), "{}", command);
        assert_eq!(normalize(&command), command);
    }
}

#[test]
fn unmatched_input_is_chat_byte_for_byte() {
    for input in ["tell me a joke", "Wie geht's?", "  spaced  out  "] {
        assert_eq!(normalize(input), format!("chat {}", input));
    }
}

#[test]
fn token_rules_precede_phrase_rules() {
    assert_eq!(normalize("list plugins and weather"), "weather list plugins and");
}

#[test]
fn known_actions_bypass_normalization() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = test_state(dir.path(), &[("greeter.plug", "greeter")], None);
    let dispatcher = create_command_registry();

    assert_eq!(
        dispatcher.interpret(&state, "large_files /tmp,10", true),
        "large_files /tmp,10"
    );
    assert_eq!(dispatcher.interpret(&state, "greet Ada", true), "greet Ada");
    assert_eq!(
        dispatcher.interpret(&state, "What's the weather like in Paris", true),
        "weather What's the like in Paris"
    );
    assert_eq!(
        dispatcher.interpret(&state, "tell me a joke", false),
        "tell me a joke"
    );
}

#[tokio::test]
async fn submit_records_the_normalized_command() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(dir.path(), &[], None);
    let dispatcher = create_command_registry();

    let (command, result) = dispatcher
        .submit(&mut state, "find duplicate files", true)
        .await;

    assert_eq!(command, "duplicates");
    assert_eq!(result, "Error: No directory provided.");
    assert_eq!(state.session.command_history(), ["duplicates"]);
}
