use super::NewsService;
use crate::config::NewsConfig;
use crate::core::error::AssistantError;
use crate::providers::base_client::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub title: String,
    pub source: String,
}

#[derive(Deserialize)]
struct TopHeadlines {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Deserialize)]
struct Article {
    title: Option<String>,
    source: ArticleSource,
}

#[derive(Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

/// NewsAPI `top-headlines`, topic used as the category.
pub struct NewsApi {
    client: HttpClient,
    api_key: Option<String>,
}

impl NewsApi {
    pub fn new(config: &NewsConfig) -> Self {
        Self {
            client: HttpClient::new(config.base_url.clone(), None, None),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl NewsService for NewsApi {
    async fn top_headlines(&self, topic: &str, limit: usize) -> Result<Vec<Headline>, AssistantError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AssistantError::Config(
                "news.api_key is not set (or export BEYE_NEWS_API_KEY)".to_string(),
            )
        })?;

        let response = self
            .client
            .get("top-headlines", &[("category", topic), ("apiKey", api_key)])
            .await?;
        let data: TopHeadlines = response.json().await?;

        Ok(data
            .articles
            .into_iter()
            .filter_map(|a| {
                a.title.map(|title| Headline {
                    title,
                    source: a.source.name.unwrap_or_else(|| "unknown".to_string()),
                })
            })
            .take(limit)
            .collect())
    }
}
