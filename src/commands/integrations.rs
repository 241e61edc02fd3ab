//! Commands backed by the network collaborators in [`crate::services`].

use super::handler::CommandHandler;
use super::{AssistantState, require, split_fields};
use crate::core::error::AssistantError;
use crate::services::{NewEvent, OutgoingEmail};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

const UPCOMING_EVENT_LIMIT: usize = 10;
const HEADLINE_LIMIT: usize = 5;
const DEFAULT_NEWS_TOPIC: &str = "general";

pub struct WeatherCommand;
pub struct ListEventsCommand;
pub struct AddEventCommand;
pub struct SendEmailCommand;
pub struct NewsCommand;

#[async_trait]
impl CommandHandler for WeatherCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let location = require(argument, "Please provide a location for the weather report.")?;
        let report = state.services.weather.current(location).await?;
        Ok(report.to_string())
    }

    fn help(&self) -> &'static str {
        "weather <location> - Fetches weather data for a location."
    }
}

#[async_trait]
impl CommandHandler for ListEventsCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        _argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let events = state.services.calendar.upcoming(UPCOMING_EVENT_LIMIT).await?;
        if events.is_empty() {
            return Ok("No upcoming events found.".to_string());
        }

        let mut text = String::from("Upcoming events:");
        for event in events {
            text.push_str(&format!("\n{} - {}", event.start, event.summary));
        }
        Ok(text)
    }

    fn help(&self) -> &'static str {
        "list_events - Lists upcoming calendar events."
    }
}

fn parse_time(label: &str, value: &str) -> Result<DateTime<Utc>, AssistantError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            AssistantError::Input(format!(
                "Invalid {} time '{}' ({}). Use RFC 3339, e.g. 2025-01-01T09:00:00Z.",
                label, value, e
            ))
        })
}

fn parse_event(argument: Option<&str>) -> Result<NewEvent, AssistantError> {
    let fields = split_fields(argument, 3, "add_event <summary>,<start_time>,<end_time>")?;
    let start = parse_time("start", fields[1])?;
    let end = parse_time("end", fields[2])?;
    if end <= start {
        return Err(AssistantError::Input(
            "The event must end after it starts.".to_string(),
        ));
    }

    Ok(NewEvent {
        summary: fields[0].to_string(),
        start,
        end,
    })
}

#[async_trait]
impl CommandHandler for AddEventCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let event = parse_event(argument)?;
        let created = state.services.calendar.insert(event).await?;
        tracing::info!(summary = %created.summary, "calendar event created");
        Ok(format!(
            "Event created: {}",
            created.link.unwrap_or(created.summary)
        ))
    }

    fn help(&self) -> &'static str {
        "add_event <summary>,<start_time>,<end_time> - Adds an event to the calendar."
    }
}

#[async_trait]
impl CommandHandler for SendEmailCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let fields = split_fields(
            argument,
            5,
            "send_email <sender>,<password>,<recipient>,<subject>,<body>",
        )?;
        let email = OutgoingEmail {
            sender: fields[0].to_string(),
            password: fields[1].to_string(),
            recipient: fields[2].to_string(),
            subject: fields[3].to_string(),
            body: fields[4].to_string(),
        };

        state.services.mail.send(&email).await?;
        Ok(format!("Email sent successfully to {}.", email.recipient))
    }

    fn help(&self) -> &'static str {
        "send_email <sender>,<password>,<recipient>,<subject>,<body> - Sends an email."
    }
}

#[async_trait]
impl CommandHandler for NewsCommand {
    async fn execute(
        &self,
        state: &mut AssistantState,
        argument: Option<&str>,
    ) -> Result<String, AssistantError> {
        let topic = argument
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_NEWS_TOPIC);

        let headlines = state
            .services
            .news
            .top_headlines(topic, HEADLINE_LIMIT)
            .await?;
        if headlines.is_empty() {
            return Ok("No news articles found for the specified topic.".to_string());
        }

        let mut text = String::from("Latest News:");
        for headline in headlines {
            text.push_str(&format!("\n- {} ({})", headline.title, headline.source));
        }
        Ok(text)
    }

    fn help(&self) -> &'static str {
        "news <topic> - Fetches the latest news for a topic."
    }
}
