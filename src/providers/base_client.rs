use crate::core::error::AssistantError;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin JSON-over-HTTP client shared by every remote collaborator.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    auth_header: Option<(String, String)>,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        base_url: String,
        auth_header: Option<(String, String)>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            base_url,
            auth_header,
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    /// Client with `Authorization: Bearer <token>`.
    pub fn with_bearer(base_url: String, token: &str) -> Self {
        Self::new(
            base_url,
            Some(("Authorization".to_string(), format!("Bearer {}", token))),
            None,
        )
    }

    pub fn url(&self, path: &str) -> String {
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn decorate(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some((name, value)) = &self.auth_header {
            request = request.header(name, value);
        }
        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }
        request
    }

    fn client() -> Result<Client, AssistantError> {
        Ok(Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("beye/", env!("CARGO_PKG_VERSION")))
            .build()?)
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, AssistantError> {
        let request = Self::client()?
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .json(payload);
        let response = self.decorate(request).send().await?;
        check_status(response).await
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, AssistantError> {
        let request = Self::client()?.get(self.url(path)).query(query);
        let response = self.decorate(request).send().await?;
        check_status(response).await
    }
}

/// Converts a non-success response into the matching typed failure.
pub async fn check_status(response: Response) -> Result<Response, AssistantError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body.trim())
    };

    Err(match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AssistantError::InvalidRequest(detail)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AssistantError::Authentication(detail),
        StatusCode::TOO_MANY_REQUESTS => AssistantError::RateLimit(detail),
        _ => AssistantError::Api(detail),
    })
}
