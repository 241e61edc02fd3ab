use crate::core::error::AssistantError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAI,
    OpenRouter,
    DeepSeek,
}

impl Provider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAI),
            "openrouter" => Some(Provider::OpenRouter),
            "deepseek" => Some(Provider::DeepSeek),
            _ => None,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::DeepSeek => "https://api.deepseek.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4.1-mini",
            Provider::OpenRouter => "google/gemini-2.0-flash-001",
            Provider::DeepSeek => "deepseek-chat",
        }
    }

    /// Environment variable consulted when the config has no key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://newsapi.org/v2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Cached OAuth token (`{"access_token": ...}`); defaults to `~/.beye/token.json`.
    pub token_path: Option<PathBuf>,
    pub calendar_id: String,
    pub base_url: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            token_path: None,
            calendar_id: "primary".to_string(),
            base_url: "https://www.googleapis.com/calendar/v3".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Plugin manifest directory; defaults to `~/.beye/plugins`.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// GitHub `owner/name` whose latest release is compared with this build.
    pub repository: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    pub active_provider: Option<Provider>,
    #[serde(default)]
    pub providers: HashMap<Provider, ProviderConfig>,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub plugins: PluginConfig,
    #[serde(default)]
    pub updates: UpdateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".beye")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn input_history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    pub fn plugin_dir(&self) -> PathBuf {
        self.plugins
            .dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("plugins"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.logging
            .file
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("logs").join("beye.log"))
    }

    pub fn calendar_token_path(&self) -> PathBuf {
        self.calendar
            .token_path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("token.json"))
    }

    /// Loads the default config file, creating it on first run.
    pub fn load() -> Result<Config, AssistantError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Config, AssistantError> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            serde_yml::from_str::<Config>(&contents)
                .map_err(|e| AssistantError::Config(format!("Parse {}: {}", path.display(), e)))?
        } else {
            let config = Config::default();
            if let Err(e) = config.save_to(path) {
                tracing::warn!(path = %path.display(), "could not write default config: {}", e);
            }
            config
        };

        config.apply_env();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AssistantError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// Fills missing API keys from the environment.
    fn apply_env(&mut self) {
        for provider in [Provider::OpenAI, Provider::OpenRouter, Provider::DeepSeek] {
            if let Ok(key) = env::var(provider.api_key_env()) {
                let entry = self.providers.entry(provider).or_default();
                if entry.api_key.is_none() {
                    entry.api_key = Some(key);
                }
            }
        }
        if self.weather.api_key.is_none() {
            self.weather.api_key = env::var("BEYE_WEATHER_API_KEY").ok();
        }
        if self.news.api_key.is_none() {
            self.news.api_key = env::var("BEYE_NEWS_API_KEY").ok();
        }
    }

    /// Command-line flags win over the file.
    pub fn apply_overrides(
        &mut self,
        provider: Option<&str>,
        model: Option<&str>,
        plugin_dir: Option<PathBuf>,
    ) -> Result<(), AssistantError> {
        if let Some(name) = provider {
            let parsed = Provider::from_str(name)
                .ok_or_else(|| AssistantError::Config(format!("Unsupported provider: {}", name)))?;
            self.active_provider = Some(parsed);
        }
        if let Some(model) = model {
            let active = self.provider();
            self.providers.entry(active).or_default().model = Some(model.to_string());
        }
        if let Some(dir) = plugin_dir {
            self.plugins.dir = Some(dir);
        }
        Ok(())
    }

    pub fn provider(&self) -> Provider {
        self.active_provider.unwrap_or_default()
    }

    pub fn provider_config(&self, provider: Provider) -> ProviderConfig {
        self.providers.get(&provider).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_fills_section_defaults() {
        let yaml = "active_provider: deepseek\nweather:\n  api_key: abc\nplugins:\n  dir: /tmp/plugs\n";
        let config: Config = serde_yml::from_str(yaml).unwrap();

        assert_eq!(config.provider(), Provider::DeepSeek);
        assert_eq!(config.weather.api_key.as_deref(), Some("abc"));
        assert_eq!(
            config.weather.base_url,
            "https://api.openweathermap.org/data/2.5"
        );
        assert_eq!(config.email.smtp_port, 465);
        assert_eq!(config.plugin_dir(), PathBuf::from("/tmp/plugs"));
        assert_eq!(config.calendar.calendar_id, "primary");
    }

    #[test]
    fn load_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "active_provider: [not, a, provider]").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
    }

    #[test]
    fn provider_names_are_case_insensitive() {
        assert_eq!(Provider::from_str("OpenRouter"), Some(Provider::OpenRouter));
        assert_eq!(Provider::from_str("gemini"), None);
    }

    #[test]
    fn cli_overrides_target_the_chosen_provider() {
        let mut config = Config::default();
        config
            .apply_overrides(Some("deepseek"), Some("deepseek-reasoner"), Some(PathBuf::from("/p")))
            .unwrap();

        assert_eq!(config.provider(), Provider::DeepSeek);
        assert_eq!(
            config.provider_config(Provider::DeepSeek).model.as_deref(),
            Some("deepseek-reasoner")
        );
        assert_eq!(config.plugin_dir(), PathBuf::from("/p"));
        assert!(config.apply_overrides(Some("gemini"), None, None).is_err());
    }
}
