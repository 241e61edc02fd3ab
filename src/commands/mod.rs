pub mod analysis;
pub mod dispatcher;
pub mod handler;
pub mod integrations;
pub mod plugin;
pub mod registry;

use crate::core::error::AssistantError;
use crate::plugins::PluginRegistry;
use crate::services::Services;
use crate::session::SessionState;
use crate::system::SystemInfo;

pub use dispatcher::{CommandDispatcher, create_command_registry};

/// Everything a command can read or change. Owned by the front end and lent
/// to the dispatcher one command at a time.
pub struct AssistantState {
    pub session: SessionState,
    pub plugins: PluginRegistry,
    pub services: Services,
    pub system: SystemInfo,
}

impl AssistantState {
    pub fn new(plugins: PluginRegistry, services: Services, system: SystemInfo) -> Self {
        Self {
            session: SessionState::new(),
            plugins,
            services,
            system,
        }
    }
}

/// A canonical command split into its action word and argument blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    pub action: String,
    pub argument: Option<&'a str>,
}

impl<'a> Command<'a> {
    pub fn parse(input: &'a str) -> Self {
        let input = input.trim();
        let (action, rest) = match input.split_once(char::is_whitespace) {
            Some((action, rest)) => (action, rest.trim()),
            None => (input, ""),
        };

        Command {
            action: action.to_lowercase(),
            argument: (!rest.is_empty()).then_some(rest),
        }
    }
}

/// The argument, or an input error carrying `missing`.
pub(crate) fn require<'a>(argument: Option<&'a str>, missing: &str) -> Result<&'a str, AssistantError> {
    argument
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AssistantError::Input(missing.to_string()))
}

/// Splits a comma-separated blob into exactly `n` trimmed fields. The last
/// field keeps any further commas.
pub(crate) fn split_fields<'a>(
    argument: Option<&'a str>,
    n: usize,
    usage: &str,
) -> Result<Vec<&'a str>, AssistantError> {
    let usage_error = || AssistantError::Input(format!("Usage: {}", usage));
    let blob = argument.ok_or_else(usage_error)?;
    let fields: Vec<&str> = blob.splitn(n, ',').map(str::trim).collect();
    if fields.len() != n || fields.iter().any(|f| f.is_empty()) {
        return Err(usage_error());
    }
    Ok(fields)
}
