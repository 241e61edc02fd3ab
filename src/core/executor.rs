use crate::core::error::AssistantError;
use crate::system::SystemInfo;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of a shell command.
#[derive(Debug, Clone)]
pub struct ShellOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl ShellOutput {
    /// Human-readable rendering: stdout, then stderr, then a status line on failure.
    pub fn render(&self) -> String {
        let mut text = self.stdout.trim_end().to_string();
        let stderr = self.stderr.trim_end();
        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr);
        }
        if !self.success {
            if !text.is_empty() {
                text.push('\n');
            }
            match self.code {
                Some(code) => text.push_str(&format!("Command exited with status {}", code)),
                None => text.push_str("Command terminated by signal"),
            }
        }
        if text.is_empty() {
            text.push_str("Command completed with no output.");
        }
        text
    }
}

fn shell_command(command: &str, system_info: &SystemInfo) -> Command {
    let mut cmd = Command::new(&system_info.shell_path);
    cmd.arg(system_info.shell_type.command_flag()).arg(command);
    cmd
}

/// Runs `command` through the user's shell and captures its output.
pub fn execute_command(command: &str, system_info: &SystemInfo) -> io::Result<ShellOutput> {
    execute_command_with_env(command, system_info, &[])
}

pub fn execute_command_with_env(
    command: &str,
    system_info: &SystemInfo,
    envs: &[(&str, &str)],
) -> io::Result<ShellOutput> {
    let mut cmd = shell_command(command, system_info);
    cmd.envs(envs.iter().copied());
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!(command, shell = %system_info.shell_path, "running shell command");
    let output = cmd.output()?;

    Ok(ShellOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        success: output.status.success(),
        code: output.status.code(),
    })
}

/// Launches a program without waiting for it.
pub fn spawn_program(program: &str, system_info: &SystemInfo) -> io::Result<()> {
    let mut cmd = shell_command(program, system_info);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::null());
    let child = cmd.spawn()?;
    tracing::info!(program, pid = child.id(), "program launched");
    Ok(())
}

/// Opens a file with the platform's default application.
pub fn open_path(path: &str) -> Result<(), AssistantError> {
    if !Path::new(path).exists() {
        return Err(AssistantError::Input(format!("File not found - {}", path)));
    }
    open::that_detached(path)
        .map_err(|e| AssistantError::Execution(format!("Unable to open {}: {}", path, e)))
}

/// Opens a URL in the default browser.
pub fn open_url(url: &str) -> Result<(), AssistantError> {
    open::that_detached(url)
        .map_err(|e| AssistantError::Execution(format!("Unable to open {}: {}", url, e)))
}
