use std::any::Any;
use std::io;
use thiserror::Error;

/// Unified error type for the assistant
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Provider returned a failure status (weather, news, calendar, chat, ...)
    #[error("API error: {0}")]
    Api(String),

    /// Provider rejected the request as malformed
    #[error("Invalid request - {0}")]
    InvalidRequest(String),

    /// Missing or rejected credentials
    #[error("Authentication failed - {0}")]
    Authentication(String),

    #[error("Rate limit exceeded - {0}")]
    RateLimit(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("{0}")]
    Input(String),

    /// Command execution errors
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),

    /// Plugin load or initialization errors
    #[error("Plugin error: {0}")]
    Plugin(String),

    #[error("Plugin '{0}' not found.")]
    PluginNotFound(String),

    /// Unknown or unexpected errors
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Coarse classification of an [`AssistantError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UserInput,
    Collaborator,
    Plugin,
    Internal,
}

impl AssistantError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AssistantError::Input(_) => FailureKind::UserInput,
            AssistantError::Api(_)
            | AssistantError::InvalidRequest(_)
            | AssistantError::Authentication(_)
            | AssistantError::RateLimit(_)
            | AssistantError::Config(_)
            | AssistantError::Network(_)
            | AssistantError::Execution(_) => FailureKind::Collaborator,
            AssistantError::Plugin(_) | AssistantError::PluginNotFound(_) => FailureKind::Plugin,
            AssistantError::Io { .. }
            | AssistantError::Serialization(_)
            | AssistantError::Unknown(_) => FailureKind::Internal,
        }
    }

    /// Text shown to the user in place of a handler result.
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::PluginNotFound(_) => self.to_string(),
            _ => format!("Error: {}", self),
        }
    }
}

/// Message carried by a caught panic.
pub fn panic_text(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AssistantError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            AssistantError::Network(format!("Connection failed: {}", err))
        } else if err.is_status() {
            AssistantError::Api(format!("API returned error status: {}", err))
        } else {
            AssistantError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        AssistantError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for AssistantError {
    fn from(err: serde_yml::Error) -> Self {
        AssistantError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<lettre::error::Error> for AssistantError {
    fn from(err: lettre::error::Error) -> Self {
        AssistantError::Input(format!("Unable to build email: {}", err))
    }
}

impl From<lettre::address::AddressError> for AssistantError {
    fn from(err: lettre::address::AddressError) -> Self {
        AssistantError::Input(format!("Invalid email address: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for AssistantError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        if err.is_permanent() {
            AssistantError::Authentication(format!("SMTP server refused the message: {}", err))
        } else {
            AssistantError::Network(format!("Unable to send email: {}", err))
        }
    }
}

impl From<String> for AssistantError {
    fn from(err: String) -> Self {
        AssistantError::Unknown(err)
    }
}

impl From<&str> for AssistantError {
    fn from(err: &str) -> Self {
        AssistantError::Unknown(err.to_string())
    }
}

impl From<Box<dyn std::error::Error>> for AssistantError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        AssistantError::Unknown(err.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for AssistantError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        AssistantError::Unknown(err.to_string())
    }
}
