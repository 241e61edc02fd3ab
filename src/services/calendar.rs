use super::CalendarService;
use crate::config::CalendarConfig;
use crate::core::error::AssistantError;
use crate::providers::base_client::HttpClient;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// An event as returned by the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub summary: String,
    pub start: String,
    pub link: Option<String>,
}

/// An event to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct CachedToken {
    #[serde(alias = "token")]
    access_token: String,
}

#[derive(Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<EventResource>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventResource {
    summary: Option<String>,
    start: Option<EventTime>,
    html_link: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl EventTime {
    fn utc(at: &DateTime<Utc>) -> Self {
        Self {
            date_time: Some(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            date: None,
            time_zone: Some("UTC".to_string()),
        }
    }
}

#[derive(Serialize)]
struct EventInsert<'a> {
    summary: &'a str,
    start: EventTime,
    end: EventTime,
}

impl From<EventResource> for CalendarEvent {
    fn from(resource: EventResource) -> Self {
        let start = resource
            .start
            .and_then(|t| t.date_time.or(t.date))
            .unwrap_or_default();
        CalendarEvent {
            summary: resource.summary.unwrap_or_else(|| "(no title)".to_string()),
            start,
            link: resource.html_link,
        }
    }
}

/// Google Calendar v3 backed by a cached OAuth access token.
pub struct GoogleCalendar {
    base_url: String,
    calendar_id: String,
    token_path: PathBuf,
}

impl GoogleCalendar {
    pub fn new(config: &CalendarConfig, token_path: PathBuf) -> Self {
        Self {
            base_url: config.base_url.clone(),
            calendar_id: config.calendar_id.clone(),
            token_path,
        }
    }

    fn client(&self) -> Result<HttpClient, AssistantError> {
        let contents = fs::read_to_string(&self.token_path).map_err(|e| {
            AssistantError::Authentication(format!(
                "no cached calendar token at {} ({})",
                self.token_path.display(),
                e
            ))
        })?;
        let token: CachedToken = serde_json::from_str(&contents)?;
        Ok(HttpClient::with_bearer(
            self.base_url.clone(),
            &token.access_token,
        ))
    }

    fn events_path(&self) -> String {
        format!("calendars/{}/events", self.calendar_id)
    }
}

#[async_trait]
impl CalendarService for GoogleCalendar {
    async fn upcoming(&self, max_results: usize) -> Result<Vec<CalendarEvent>, AssistantError> {
        let client = self.client()?;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let max_results = max_results.to_string();

        let response = client
            .get(
                &self.events_path(),
                &[
                    ("timeMin", now.as_str()),
                    ("maxResults", max_results.as_str()),
                    ("singleEvents", "true"),
                    ("orderBy", "startTime"),
                ],
            )
            .await?;
        let list: EventList = response.json().await?;

        Ok(list.items.into_iter().map(CalendarEvent::from).collect())
    }

    async fn insert(&self, event: NewEvent) -> Result<CalendarEvent, AssistantError> {
        let client = self.client()?;
        let body = EventInsert {
            summary: &event.summary,
            start: EventTime::utc(&event.start),
            end: EventTime::utc(&event.end),
        };

        let response = client.post(&self.events_path(), &body).await?;
        let created: EventResource = response.json().await?;
        tracing::info!(summary = %event.summary, "calendar event created");

        Ok(created.into())
    }
}
