use super::handler::CommandHandler;
use super::{AssistantState, require};
use crate::core::error::AssistantError;

use async_trait::async_trait;

pub struct ListPluginsCommand;
pub struct EnablePluginCommand;
pub struct DisablePluginCommand;

#[async_trait]
impl CommandHandler for ListPluginsCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        _argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let names = state.plugins.list();
        if names.is_empty() {
            return Ok(format!(
                "No plugins installed. Add manifests to {}.",
                state.plugins.dir().display()
            ));
        }

        let mut text = String::from("Installed Plugins:");
        for name in names {
            match state.plugins.get(&name).and_then(|p| p.description()) {
                Some(description) => text.push_str(&format!("\n{} - {}", name, description)),
                None => text.push_str(&format!("\n{}", name)),
            }
        }
        Ok(text)
    }

    fn help(&self) -> &'static str {
        "list_plugins - Lists all loaded plugins."
    }
}

#[async_trait]
impl CommandHandler for EnablePluginCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let name = require(argument, "No plugin name provided.")?;
        state.plugins.enable(name)?;
        tracing::info!(plugin = name, "plugin enabled");
        Ok(format!("Plugin '{}' enabled.", name))
    }

    fn help(&self) -> &'static str {
        "enable_plugin <plugin_name> - Enables a specific plugin."
    }
}

#[async_trait]
impl CommandHandler for DisablePluginCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let name = require(argument, "No plugin name provided.")?;
        state.plugins.disable(name)?;
        tracing::info!(plugin = name, "plugin disabled");
        Ok(format!("Plugin '{}' disabled.", name))
    }

    fn help(&self) -> &'static str {
        "disable_plugin <plugin_name> - Disables a specific plugin."
    }
}
