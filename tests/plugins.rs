mod common;

use beye::commands::create_command_registry;
use beye::plugins::PluginRegistry;
use common::{FixtureLoader, write_plugins};

#[test]
fn second_of_three_failing_leaves_first_and_third() {
    let dir = tempfile::tempdir().unwrap();
    write_plugins(
        dir.path(),
        &[
            ("a.plug", "greeter"),
            ("b.plug", "no-such-kind"),
            ("c.plug", "greeter"),
        ],
    );
    let mut registry = PluginRegistry::new(dir.path(), Box::new(FixtureLoader));

    let report = registry.load_all().unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.list(), vec!["a".to_string(), "c".to_string()]);
    assert_eq!(report.loaded, vec!["a".to_string(), "c".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert!(report.summary().contains("Error loading plugin b"));
}

#[test]
fn first_exporter_wins_for_shared_actions() {
    let dir = tempfile::tempdir().unwrap();
    write_plugins(dir.path(), &[("zeta.plug", "greeter"), ("alpha.plug", "greeter")]);
    let mut registry = PluginRegistry::new(dir.path(), Box::new(FixtureLoader));
    registry.load_all().unwrap();

    let (owner, _) = registry.find_command("greet").unwrap();
    assert_eq!(owner, "alpha");
}

#[cfg(unix)]
mod manifests {
    use super::*;
    use beye::commands::AssistantState;
    use beye::plugins::ManifestLoader;

    #[tokio::test]
    async fn manifest_plugin_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_plugins(
            dir.path(),
            &[
                (
                    "greeter.yaml",
                    "description: Greets people\ninitialize: \"true\"\ncommands:\n  greet: echo \"hello $BEYE_ARGUMENT\"\n",
                ),
                ("broken.yaml", "initialize: \"exit 1\"\n"),
                ("notes.txt", "not a plugin"),
            ],
        );
        let mut plugins = PluginRegistry::new(dir.path(), Box::new(ManifestLoader::new(common::sh())));
        let report = plugins.load_all().unwrap();
        assert_eq!(report.loaded, vec!["greeter".to_string()]);
        assert_eq!(report.failed[0].0, "broken");

        let (services, _) = common::mock_services(None);
        let mut state = AssistantState::new(plugins, services, common::sh());
        let dispatcher = create_command_registry();

        assert_eq!(dispatcher.dispatch(&mut state, "greet world").await, "hello world");
        assert_eq!(
            dispatcher.dispatch(&mut state, "list_plugins").await,
            "Installed Plugins:\ngreeter - Greets people"
        );
    }
}
