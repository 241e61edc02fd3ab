use crate::providers::{Message, Role};

/// Conversation turns and command history for one run of the assistant.
///
/// Both lists are append-only and unbounded. [`SessionState::reset`] clears the
/// conversation only; command history lives until the process exits.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    turns: Vec<Message>,
    command_history: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(Message {
            role,
            content: content.into(),
        });
    }

    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    /// Forget the conversation. Command history is untouched.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn record_command(&mut self, command: impl Into<String>) {
        self.command_history.push(command.into());
    }

    pub fn command_history(&self) -> &[String] {
        &self.command_history
    }
}
