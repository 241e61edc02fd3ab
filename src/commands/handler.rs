use super::{AssistantState, require};
use crate::core::error::AssistantError;
use crate::core::executor;
use crate::providers::Role;
use crate::services::updates::{CURRENT_VERSION, update_message};
use crate::system::{SystemUsage, Thresholds};

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(
        &self,
        state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError>;

    fn help(&self) -> &'static str;
}

pub struct HelpCommand {
    lines: Vec<&'static str>,
}
pub struct HelloCommand;
pub struct OpenCommand;
pub struct RunCommand;
pub struct BrowseCommand;
pub struct ShellCommand;
pub struct ChatCommand;
pub struct ResetChatCommand;
pub struct SystemCommand;
pub struct MonitorCommand;
pub struct ScheduleCommand;
pub struct CheckUpdatesCommand;

impl HelpCommand {
    /// `lines` are the help strings of every other built-in, in display order.
    pub fn new(lines: Vec<&'static str>) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        _argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let mut text = String::from("Available Commands:");
        let builtins = self.lines.iter().copied().chain(std::iter::once(self.help()));
        for (i, line) in builtins.enumerate() {
            text.push_str(&format!("\n{}. {}", i + 1, line));
        }

        let plugin_commands = state.plugins.command_names();
        if !plugin_commands.is_empty() {
            text.push_str("\n\nPlugin Commands:");
            for (action, plugin) in plugin_commands {
                text.push_str(&format!("\n- {} ({})", action, plugin));
            }
        }
        Ok(text)
    }

    fn help(&self) -> &'static str {
        "help - Displays this list of commands."
    }
}

#[async_trait]
impl CommandHandler for HelloCommand {
    async fn execute(
        &self,
        _state: &mut AssistantState,
        _argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        Ok("Hello! How can I assist you today?".to_string())
    }

    fn help(&self) -> &'static str {
        "hello - Greets the user."
    }
}

#[async_trait]
impl CommandHandler for OpenCommand {
    async fn execute(
        &self,
        _state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let path = require(argument, "No file path provided.")?;
        executor::open_path(path)?;
        Ok(format!("Opening file: {}", path))
    }

    fn help(&self) -> &'static str {
        "open <file_path> - Opens the specified file."
    }
}

#[async_trait]
impl CommandHandler for RunCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let program = require(argument, "No program path provided.")?;
        executor::spawn_program(program, &state.system)?;
        Ok(format!("Running program: {}", program))
    }

    fn help(&self) -> &'static str {
        "run <program_path> - Runs the specified program."
    }
}

#[async_trait]
impl CommandHandler for BrowseCommand {
    async fn execute(
        &self,
        _state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let url = require(argument, "No URL provided.")?;
        executor::open_url(url)?;
        Ok(format!("Opening URL: {}", url))
    }

    fn help(&self) -> &'static str {
        "browse <url> - Opens the specified URL in a browser."
    }
}

#[async_trait]
impl CommandHandler for ShellCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let command = require(argument, "No shell command provided.")?;
        let output = executor::execute_command(command, &state.system)?;
        Ok(output.render())
    }

    fn help(&self) -> &'static str {
        "shell <command> - Executes a shell command."
    }
}

#[async_trait]
impl CommandHandler for ChatCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let prompt = require(argument, "No input provided for chat.")?;

        // The user turn stays even if the provider fails.
        state.session.append_turn(Role::User, prompt);
        let reply = state
            .services
            .chat
            .get_response(state.session.turns())
            .await?;
        state.session.append_turn(Role::Assistant, reply.clone());

        tracing::debug!(
            model = state.services.chat.model(),
            turns = state.session.turns().len(),
            "chat reply received"
        );
        Ok(reply)
    }

    fn help(&self) -> &'static str {
        "chat <text> - Talks to the configured chat model."
    }
}

#[async_trait]
impl CommandHandler for ResetChatCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        _argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        state.session.reset();
        Ok("Chat conversation history reset.".to_string())
    }

    fn help(&self) -> &'static str {
        "reset_chat - Resets the chat conversation history."
    }
}

async fn sample_usage() -> Result<SystemUsage, AssistantError> {
    tokio::task::spawn_blocking(SystemUsage::sample)
        .await
        .map_err(|e| AssistantError::Execution(format!("Unable to sample system usage: {}", e)))
}

#[async_trait]
impl CommandHandler for SystemCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        _argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let usage = sample_usage().await?;
        Ok(format!(
            "OS: {}\nShell: {}\n{}",
            state.system.os_info, state.system.shell_path, usage
        ))
    }

    fn help(&self) -> &'static str {
        "system - Shows system resource usage (CPU, Memory, Disk)."
    }
}

#[async_trait]
impl CommandHandler for MonitorCommand {
    async fn execute(
        &self,
        _state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let thresholds = Thresholds::parse(argument.unwrap_or_default())?;
        let usage = sample_usage().await?;
        let alerts = thresholds.alerts(&usage);

        if alerts.is_empty() {
            return Ok("System is operating within normal limits.".to_string());
        }
        for alert in &alerts {
            tracing::warn!("{}", alert);
        }
        Ok(alerts.join("\n"))
    }

    fn help(&self) -> &'static str {
        "monitor cpu=<value>,memory=<value>,disk=<value> - Monitors system thresholds."
    }
}

/// Splits `<command>,<delay_seconds>` on the last comma.
fn parse_schedule(argument: Option<&str>) -> Result<(&str, Duration), AssistantError> {
    let usage = || AssistantError::Input("Usage: schedule <command>,<delay_in_seconds>".to_string());
    let (command, delay) = argument.and_then(|a| a.rsplit_once(',')).ok_or_else(usage)?;
    let command = command.trim();
    if command.is_empty() {
        return Err(usage());
    }

    let seconds: f64 = delay.trim().parse().map_err(|_| {
        AssistantError::Input(format!("Delay '{}' is not a number of seconds.", delay.trim()))
    })?;
    let delay = Duration::try_from_secs_f64(seconds).map_err(|_| {
        AssistantError::Input(format!("Delay '{}' must be a non-negative number.", seconds))
    })?;
    Ok((command, delay))
}

#[async_trait]
impl CommandHandler for ScheduleCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let (command, delay) = parse_schedule(argument)?;
        let task = command.to_string();
        let system = state.system.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let label = task.clone();
            let result =
                tokio::task::spawn_blocking(move || executor::execute_command(&task, &system)).await;
            match result {
                Ok(Ok(output)) => {
                    tracing::info!(task = %label, success = output.success, "scheduled task finished: {}", output.render())
                }
                Ok(Err(e)) => tracing::error!(task = %label, "scheduled task failed: {}", e),
                Err(e) => tracing::error!(task = %label, "scheduled task panicked: {}", e),
            }
        });

        tracing::info!(task = command, delay_secs = delay.as_secs_f64(), "task scheduled");
        Ok(format!(
            "Task '{}' scheduled to run in {} seconds.",
            command,
            delay.as_secs_f64()
        ))
    }

    fn help(&self) -> &'static str {
        "schedule <command>,<delay_in_seconds> - Schedules a command to run after a delay."
    }
}

#[async_trait]
impl CommandHandler for CheckUpdatesCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        _argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let latest = state.services.updates.latest_version().await?;
        Ok(update_message(CURRENT_VERSION, &latest))
    }

    fn help(&self) -> &'static str {
        "check_updates - Checks for a newer release."
    }
}
