use super::UpdateChecker;
use crate::core::error::AssistantError;
use crate::providers::base_client::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;

pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

/// Latest release tag of a GitHub repository.
pub struct GithubReleases {
    repository: Option<String>,
}

impl GithubReleases {
    pub fn new(repository: Option<String>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UpdateChecker for GithubReleases {
    async fn latest_version(&self) -> Result<String, AssistantError> {
        let repository = self.repository.as_deref().ok_or_else(|| {
            AssistantError::Config("updates.repository is not set".to_string())
        })?;

        let client = HttpClient::new("https://api.github.com".to_string(), None, None);
        let response = client
            .get(&format!("repos/{}/releases/latest", repository), &[])
            .await?;
        let release: Release = response.json().await?;
        Ok(release.tag_name)
    }
}

/// Compares a release tag with the running version, ignoring a leading `v`.
pub fn update_message(current: &str, latest: &str) -> String {
    let normalize = |v: &str| v.trim().trim_start_matches('v').to_string();
    if normalize(current) == normalize(latest) {
        "You are running the latest version.".to_string()
    } else {
        format!("Update available: {} (running {}).", latest.trim(), current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_prefix_is_ignored() {
        assert_eq!(update_message("1.0.0", "v1.0.0"), "You are running the latest version.");
    }

    #[test]
    fn newer_tag_is_reported() {
        assert_eq!(
            update_message("1.0.0", "v1.2.0"),
            "Update available: v1.2.0 (running 1.0.0)."
        );
    }
}
