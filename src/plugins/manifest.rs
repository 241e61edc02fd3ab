use super::{Plugin, PluginLoader};
use crate::core::error::AssistantError;
use crate::core::executor::{self, ShellOutput};
use crate::system::SystemInfo;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Environment variable carrying the argument blob into plugin commands.
pub const ARGUMENT_ENV: &str = "BEYE_ARGUMENT";

/// On-disk plugin description.
///
/// ```yaml
/// description: Greets people
/// initialize: echo ready
/// shutdown: echo bye
/// commands:
///   greet: echo "hello $BEYE_ARGUMENT"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginManifest {
    pub description: Option<String>,
    pub initialize: Option<String>,
    pub shutdown: Option<String>,
    #[serde(default)]
    pub commands: BTreeMap<String, String>,
}

/// A plugin whose hooks and commands are shell snippets.
pub struct ManifestPlugin {
    description: Option<String>,
    initialize: String,
    shutdown: Option<String>,
    commands: BTreeMap<String, String>,
    system: SystemInfo,
}

impl ManifestPlugin {
    fn run(&self, hook: &str, script: &str, argument: Option<&str>) -> Result<ShellOutput, AssistantError> {
        let envs = [(ARGUMENT_ENV, argument.unwrap_or(""))];
        let output = executor::execute_command_with_env(script, &self.system, &envs)?;
        if output.success {
            Ok(output)
        } else {
            Err(AssistantError::Plugin(format!(
                "{} failed: {}",
                hook,
                output.render()
            )))
        }
    }
}

impl Plugin for ManifestPlugin {
    fn initialize(&self) -> Result<(), AssistantError> {
        self.run("initialize", &self.initialize, None).map(|_| ())
    }

    fn shutdown(&self) -> Result<(), AssistantError> {
        match &self.shutdown {
            Some(script) => self.run("shutdown", script, None).map(|_| ()),
            None => Ok(()),
        }
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn commands(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    fn run_command(&self, action: &str, argument: Option<&str>) -> Result<String, AssistantError> {
        let script = self.commands.get(action).ok_or_else(|| {
            AssistantError::Plugin(format!("this plugin does not provide '{}'", action))
        })?;
        self.run(action, script, argument).map(|output| output.render())
    }
}

/// Keys the command table by lower-cased action, as the router parses them.
fn command_table(
    raw: BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, AssistantError> {
    let mut commands = BTreeMap::new();
    for (name, script) in raw {
        let action = name.trim().to_lowercase();
        if action.is_empty() || action.contains(char::is_whitespace) {
            return Err(AssistantError::Plugin(format!(
                "command name '{}' must be a single word",
                name
            )));
        }
        if commands.insert(action.clone(), script).is_some() {
            return Err(AssistantError::Plugin(format!(
                "command '{}' is defined more than once",
                action
            )));
        }
    }
    Ok(commands)
}

/// Loads `*.yaml` / `*.yml` plugin manifests.
pub struct ManifestLoader {
    system: SystemInfo,
}

impl ManifestLoader {
    pub fn new(system: SystemInfo) -> Self {
        Self { system }
    }
}

impl PluginLoader for ManifestLoader {
    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn load(&self, path: &Path) -> Result<Box<dyn Plugin>, AssistantError> {
        let contents = fs::read_to_string(path)?;
        let manifest: PluginManifest = serde_yml::from_str(&contents)?;

        let initialize = manifest
            .initialize
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                AssistantError::Plugin("manifest does not define an initialize hook".to_string())
            })?;

        let commands = command_table(manifest.commands)?;

        Ok(Box::new(ManifestPlugin {
            description: manifest.description,
            initialize,
            shutdown: manifest.shutdown,
            commands,
            system: self.system.clone(),
        }))
    }
}
