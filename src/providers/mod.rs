use crate::core::error::AssistantError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Chat-completion collaborator: the whole conversation goes in, one reply comes out.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AssistantError>;

    fn model(&self) -> &str;
}

pub mod base_client;
pub mod factory;
pub mod openai_style;
