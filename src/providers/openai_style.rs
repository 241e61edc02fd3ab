use crate::core::error::AssistantError;
use crate::providers::base_client::HttpClient;
use crate::providers::{LLMProvider, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

/// Any provider speaking the OpenAI `chat/completions` dialect.
#[derive(Clone)]
pub struct OpenAIStyleProvider {
    client: HttpClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAIStyleProvider {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        let auth_header = Some(("Authorization".to_string(), format!("Bearer {}", api_key)));

        Self {
            client: HttpClient::new(base_url, auth_header, extra_headers),
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_sampling(mut self, max_tokens: Option<u32>, temperature: Option<f32>) -> Self {
        if let Some(max_tokens) = max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = temperature {
            self.temperature = temperature;
        }
        self
    }
}

#[async_trait]
impl LLMProvider for OpenAIStyleProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AssistantError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| ChatCompletionMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.client.post("chat/completions", &payload).await?;

        let response_body: String = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AssistantError::Api("No choices in API response".to_string()))?;

        Ok(content.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
