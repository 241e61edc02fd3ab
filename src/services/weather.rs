use super::WeatherService;
use crate::config::WeatherConfig;
use crate::core::error::AssistantError;
use crate::providers::base_client::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

/// Current conditions for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: String,
    pub condition: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Weather in {}:\n- Condition: {}\n- Temperature: {}°C\n- Humidity: {}%\n- Wind Speed: {} m/s",
            capitalize(&self.location),
            capitalize(&self.condition),
            self.temperature,
            self.humidity,
            self.wind_speed
        )
    }
}

#[derive(Deserialize)]
struct CurrentWeather {
    weather: Vec<Condition>,
    main: MainReadings,
    wind: Wind,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct Wind {
    speed: f64,
}

/// OpenWeatherMap current-weather endpoint, metric units.
pub struct OpenWeatherMap {
    client: HttpClient,
    api_key: Option<String>,
}

impl OpenWeatherMap {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            client: HttpClient::new(config.base_url.clone(), None, None),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl WeatherService for OpenWeatherMap {
    async fn current(&self, location: &str) -> Result<WeatherReport, AssistantError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AssistantError::Config(
                "weather.api_key is not set (or export BEYE_WEATHER_API_KEY)".to_string(),
            )
        })?;

        let response = self
            .client
            .get(
                "weather",
                &[("q", location), ("appid", api_key), ("units", "metric")],
            )
            .await?;
        let data: CurrentWeather = response.json().await?;

        let condition = data
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .unwrap_or_else(|| "unknown".to_string());

        tracing::info!(location, "fetched weather data");
        Ok(WeatherReport {
            location: location.to_string(),
            condition,
            temperature: data.main.temp,
            humidity: data.main.humidity,
            wind_speed: data.wind.speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_matches_display_format() {
        let report = WeatherReport {
            location: "paris".to_string(),
            condition: "light rain".to_string(),
            temperature: 12.5,
            humidity: 81.0,
            wind_speed: 4.1,
        };
        assert_eq!(
            report.to_string(),
            "Weather in Paris:\n- Condition: Light rain\n- Temperature: 12.5°C\n- Humidity: 81%\n- Wind Speed: 4.1 m/s"
        );
    }

    #[test]
    fn parses_openweathermap_payload() {
        let body = r#"{"weather":[{"description":"clear sky"}],"main":{"temp":21.3,"humidity":40},"wind":{"speed":3.6},"name":"Paris"}"#;
        let parsed: CurrentWeather = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.weather[0].description, "clear sky");
        assert_eq!(parsed.main.humidity, 40.0);
        assert_eq!(parsed.wind.speed, 3.6);
    }
}
