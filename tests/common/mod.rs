#![allow(dead_code)]

use async_trait::async_trait;
use beye::commands::AssistantState;
use beye::core::error::AssistantError;
use beye::plugins::{Plugin, PluginLoader, PluginRegistry};
use beye::providers::{LLMProvider, Message};
use beye::services::{
    CalendarEvent, CalendarService, Headline, MailService, NewEvent, NewsService, OutgoingEmail,
    Services, UpdateChecker, WeatherReport, WeatherService,
};
use beye::system::{ShellType, SystemInfo};
use chrono::SecondsFormat;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Replies with the number of turns it was sent, or fails with a rate limit.
pub struct MockChat {
    pub fail_with: Option<String>,
    pub calls: Arc<Mutex<Vec<Vec<Message>>>>,
}

#[async_trait]
impl LLMProvider for MockChat {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AssistantError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        match &self.fail_with {
            Some(reason) => Err(AssistantError::RateLimit(reason.clone())),
            None => Ok(format!("reply to {} turns", messages.len())),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

pub struct MockWeather;

#[async_trait]
impl WeatherService for MockWeather {
    async fn current(&self, location: &str) -> Result<WeatherReport, AssistantError> {
        Ok(WeatherReport {
            location: location.to_string(),
            condition: "clear sky".to_string(),
            temperature: 21.5,
            humidity: 40.0,
            wind_speed: 3.2,
        })
    }
}

pub struct MockNews {
    pub topics: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl NewsService for MockNews {
    async fn top_headlines(&self, topic: &str, limit: usize) -> Result<Vec<Headline>, AssistantError> {
        self.topics.lock().unwrap().push(topic.to_string());
        Ok((1..=limit)
            .map(|i| Headline {
                title: format!("{} story {}", topic, i),
                source: "Wire".to_string(),
            })
            .collect())
    }
}

/// In-memory calendar: inserted events are listed back in insertion order.
pub struct MockCalendar {
    pub events: Arc<Mutex<Vec<CalendarEvent>>>,
}

#[async_trait]
impl CalendarService for MockCalendar {
    async fn upcoming(&self, max_results: usize) -> Result<Vec<CalendarEvent>, AssistantError> {
        let events = self.events.lock().unwrap();
        Ok(events.iter().take(max_results).cloned().collect())
    }

    async fn insert(&self, event: NewEvent) -> Result<CalendarEvent, AssistantError> {
        let created = CalendarEvent {
            summary: event.summary,
            start: event.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            link: None,
        };
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }
}

pub struct MockMail {
    pub sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

#[async_trait]
impl MailService for MockMail {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AssistantError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub struct MockUpdates(pub &'static str);

#[async_trait]
impl UpdateChecker for MockUpdates {
    async fn latest_version(&self) -> Result<String, AssistantError> {
        Ok(self.0.to_string())
    }
}

/// Handles on the mock collaborators, for assertions.
#[derive(Default, Clone)]
pub struct Recorder {
    pub chat_calls: Arc<Mutex<Vec<Vec<Message>>>>,
    pub news_topics: Arc<Mutex<Vec<String>>>,
    pub events: Arc<Mutex<Vec<CalendarEvent>>>,
    pub mail: Arc<Mutex<Vec<OutgoingEmail>>>,
}

pub fn mock_services(chat_failure: Option<&str>) -> (Services, Recorder) {
    let recorded = Recorder::default();
    let services = Services {
        chat: Box::new(MockChat {
            fail_with: chat_failure.map(str::to_string),
            calls: recorded.chat_calls.clone(),
        }),
        weather: Box::new(MockWeather),
        news: Box::new(MockNews {
            topics: recorded.news_topics.clone(),
        }),
        calendar: Box::new(MockCalendar {
            events: recorded.events.clone(),
        }),
        mail: Box::new(MockMail {
            sent: recorded.mail.clone(),
        }),
        updates: Box::new(MockUpdates("v9.9.9")),
    };
    (services, recorded)
}

pub fn sh() -> SystemInfo {
    SystemInfo {
        os_info: "TestOS".to_string(),
        shell_path: "/bin/sh".to_string(),
        shell_type: ShellType::UnixLike,
    }
}

/// Exports `greet`, echoing its argument.
pub struct Greeter;

impl Plugin for Greeter {
    fn initialize(&self) -> Result<(), AssistantError> {
        Ok(())
    }

    fn description(&self) -> Option<&str> {
        Some("says hello")
    }

    fn commands(&self) -> Vec<String> {
        vec!["greet".to_string()]
    }

    fn run_command(&self, _action: &str, argument: Option<&str>) -> Result<String, AssistantError> {
        Ok(format!("hi {}", argument.unwrap_or("there")))
    }
}

/// Exports `explode`, which panics.
pub struct Volatile;

impl Plugin for Volatile {
    fn initialize(&self) -> Result<(), AssistantError> {
        Ok(())
    }

    fn commands(&self) -> Vec<String> {
        vec!["explode".to_string()]
    }

    fn run_command(&self, _action: &str, _argument: Option<&str>) -> Result<String, AssistantError> {
        panic!("plugin blew up")
    }
}

/// Loads `*.plug` files; the body names the plugin kind.
pub struct FixtureLoader;

impl PluginLoader for FixtureLoader {
    fn extensions(&self) -> &[&str] {
        &["plug"]
    }

    fn load(&self, path: &Path) -> Result<Box<dyn Plugin>, AssistantError> {
        match fs::read_to_string(path)?.trim() {
            "greeter" => Ok(Box::new(Greeter)),
            "volatile" => Ok(Box::new(Volatile)),
            other => Err(AssistantError::Plugin(format!("unknown fixture '{}'", other))),
        }
    }
}

pub fn write_plugins(dir: &Path, files: &[(&str, &str)]) {
    for (name, body) in files {
        fs::write(dir.join(name), body).unwrap();
    }
}

/// Assistant state over mock collaborators and a loaded fixture plugin directory.
pub fn test_state(
    dir: &Path,
    plugin_files: &[(&str, &str)],
    chat_failure: Option<&str>,
) -> (AssistantState, Recorder) {
    write_plugins(dir, plugin_files);
    let mut plugins = PluginRegistry::new(dir, Box::new(FixtureLoader));
    plugins.load_all().unwrap();
    let (services, recorded) = mock_services(chat_failure);
    (AssistantState::new(plugins, services, sh()), recorded)
}
