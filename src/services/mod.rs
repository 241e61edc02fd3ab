//! External collaborators. Each is a trait so the command handlers can be
//! exercised against in-memory doubles.

pub mod calendar;
pub mod email;
pub mod news;
pub mod updates;
pub mod weather;

use crate::config::Config;
use crate::core::error::AssistantError;
use crate::providers::{LLMProvider, Message, factory::ProviderFactory};
use async_trait::async_trait;

pub use calendar::{CalendarEvent, NewEvent};
pub use email::OutgoingEmail;
pub use news::Headline;
pub use weather::WeatherReport;

#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn current(&self, location: &str) -> Result<WeatherReport, AssistantError>;
}

#[async_trait]
pub trait NewsService: Send + Sync {
    async fn top_headlines(&self, topic: &str, limit: usize) -> Result<Vec<Headline>, AssistantError>;
}

#[async_trait]
pub trait CalendarService: Send + Sync {
    async fn upcoming(&self, max_results: usize) -> Result<Vec<CalendarEvent>, AssistantError>;
    async fn insert(&self, event: NewEvent) -> Result<CalendarEvent, AssistantError>;
}

#[async_trait]
pub trait MailService: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AssistantError>;
}

#[async_trait]
pub trait UpdateChecker: Send + Sync {
    async fn latest_version(&self) -> Result<String, AssistantError>;
}

/// Every collaborator the command handlers talk to.
pub struct Services {
    pub chat: Box<dyn LLMProvider>,
    pub weather: Box<dyn WeatherService>,
    pub news: Box<dyn NewsService>,
    pub calendar: Box<dyn CalendarService>,
    pub mail: Box<dyn MailService>,
    pub updates: Box<dyn UpdateChecker>,
}

impl Services {
    pub fn from_config(config: &Config) -> Self {
        let provider = config.provider();
        let chat = ProviderFactory::new()
            .create(&provider, &config.provider_config(provider))
            .unwrap_or_else(|e| {
                tracing::warn!("chat provider unavailable: {}", e);
                Box::new(UnavailableProvider {
                    reason: e.to_string(),
                })
            });

        Self {
            chat,
            weather: Box::new(weather::OpenWeatherMap::new(&config.weather)),
            news: Box::new(news::NewsApi::new(&config.news)),
            calendar: Box::new(calendar::GoogleCalendar::new(
                &config.calendar,
                config.calendar_token_path(),
            )),
            mail: Box::new(email::SmtpMailer::new(&config.email)),
            updates: Box::new(updates::GithubReleases::new(
                config.updates.repository.clone(),
            )),
        }
    }
}

/// Stands in for a chat provider that could not be configured at startup.
struct UnavailableProvider {
    reason: String,
}

#[async_trait]
impl LLMProvider for UnavailableProvider {
    async fn get_response(&self, _messages: &[Message]) -> Result<String, AssistantError> {
        Err(AssistantError::Config(format!(
            "chat is not configured: {}",
            self.reason
        )))
    }

    fn model(&self) -> &str {
        "unavailable"
    }
}
