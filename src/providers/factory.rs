use crate::config::{Provider, ProviderConfig};
use crate::core::error::AssistantError;
use crate::providers::{LLMProvider, openai_style::OpenAIStyleProvider};
use std::collections::HashMap;

type ProviderCreator =
    Box<dyn Fn(&ProviderConfig) -> Result<Box<dyn LLMProvider>, AssistantError> + Send + Sync>;

pub struct ProviderFactory {
    creators: HashMap<Provider, ProviderCreator>,
}

fn openai_style(provider: Provider, extra_headers: Option<HashMap<String, String>>) -> ProviderCreator {
    Box::new(move |config: &ProviderConfig| {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AssistantError::Authentication(format!(
                "no API key configured (set providers.{:?}.api_key or {})",
                provider,
                provider.api_key_env()
            ))
        })?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| provider.default_base_url().to_string());
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string());

        let provider = OpenAIStyleProvider::new(base_url, api_key, model, extra_headers.clone())
            .with_sampling(config.max_tokens, config.temperature);
        Ok(Box::new(provider) as Box<dyn LLMProvider>)
    })
}

impl ProviderFactory {
    pub fn new() -> Self {
        let mut creators = HashMap::new();

        creators.insert(Provider::OpenAI, openai_style(Provider::OpenAI, None));
        creators.insert(
            Provider::OpenRouter,
            openai_style(
                Provider::OpenRouter,
                Some(HashMap::from([("X-Title".to_string(), "beye".to_string())])),
            ),
        );
        creators.insert(Provider::DeepSeek, openai_style(Provider::DeepSeek, None));

        Self { creators }
    }

    pub fn create(
        &self,
        provider: &Provider,
        config: &ProviderConfig,
    ) -> Result<Box<dyn LLMProvider>, AssistantError> {
        self.creators
            .get(provider)
            .ok_or_else(|| AssistantError::Config(format!("Provider not found: {:?}", provider)))
            .and_then(|creator| creator(config))
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::new()
    }
}
