//! GitHub REST API registry implementation

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_GITHUB_API_URL, FETCH_TIMEOUT_MS, token_from_env};
use crate::version::error::RegistryError;
use crate::version::registry::Registry;

/// Response from the "latest release" endpoint
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Item of the "list tags" endpoint
#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Registry implementation for the GitHub Releases and Tags APIs
pub struct GitHubRegistry {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubRegistry {
    /// Creates a new GitHubRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_millis(FETCH_TIMEOUT_MS))
    }

    /// Creates a new GitHubRegistry whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!(
                    env!("CARGO_PKG_NAME"),
                    "/",
                    env!("CARGO_PKG_VERSION")
                ))
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sets the bearer token sent with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Issues a GET against `path` and returns the body of a successful response
    async fn get(&self, path: &str) -> Result<String, RegistryError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            RegistryError::Transport(e.to_string())
        })?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(url));
        }

        if status == StatusCode::FORBIDDEN {
            warn!("GitHub API rate limit hit: {}", url);
            return Err(RegistryError::RateLimited);
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(RegistryError::Upstream {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            warn!("Failed to read response body from {}: {}", url, e);
            RegistryError::Transport(e.to_string())
        })
    }
}

impl Default for GitHubRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_GITHUB_API_URL).with_token(token_from_env())
    }
}

#[async_trait::async_trait]
impl Registry for GitHubRegistry {
    async fn fetch_latest_release(&self, name: &str) -> Result<String, RegistryError> {
        let body = self.get(&format!("/repos/{}/releases/latest", name)).await?;

        let release: Release = serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to parse GitHub release response for {}: {}", name, e);
            RegistryError::Decode(e.to_string())
        })?;

        Ok(release.tag_name)
    }

    async fn fetch_tags(&self, name: &str) -> Result<Vec<String>, RegistryError> {
        let body = self.get(&format!("/repos/{}/tags", name)).await?;

        let tags: Vec<Tag> = serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to parse GitHub tags response for {}: {}", name, e);
            RegistryError::Decode(e.to_string())
        })?;

        Ok(tags.into_iter().map(|t| t.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use rstest::rstest;

    #[tokio::test]
    async fn fetch_latest_release_returns_tag_name() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/actions/checkout/releases/latest")
            .match_header("accept", "application/vnd.github+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tag_name": "v4.1.0", "name": "v4.1.0", "draft": false}"#)
            .create_async()
            .await;

        let registry = GitHubRegistry::new(&server.url());
        let result = registry
            .fetch_latest_release("actions/checkout")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, "v4.1.0");
    }

    #[tokio::test]
    async fn fetch_latest_release_sends_bearer_token_when_configured() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/actions/checkout/releases/latest")
            .match_header("authorization", "Bearer ghp_secret")
            .with_status(200)
            .with_body(r#"{"tag_name": "v4.1.0"}"#)
            .create_async()
            .await;

        let registry =
            GitHubRegistry::new(&server.url()).with_token(Some("ghp_secret".to_string()));
        let result = registry.fetch_latest_release("actions/checkout").await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "v4.1.0");
    }

    #[tokio::test]
    async fn fetch_latest_release_omits_authorization_without_token() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/actions/checkout/releases/latest")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"tag_name": "v4.1.0"}"#)
            .create_async()
            .await;

        let registry = GitHubRegistry::new(&server.url());
        let result = registry.fetch_latest_release("actions/checkout").await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn fetch_latest_release_returns_not_found_for_404() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/some/repo/releases/latest")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let registry = GitHubRegistry::new(&server.url());
        let result = registry.fetch_latest_release("some/repo").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_latest_release_returns_rate_limited_for_403() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/actions/checkout/releases/latest")
            .with_status(403)
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let registry = GitHubRegistry::new(&server.url());
        let result = registry.fetch_latest_release("actions/checkout").await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(matches!(err, RegistryError::RateLimited));
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[rstest]
    #[case(429)]
    #[case(500)]
    #[case(502)]
    #[tokio::test]
    async fn fetch_latest_release_returns_upstream_error_for_other_statuses(#[case] status: u16) {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/actions/checkout/releases/latest")
            .with_status(status as usize)
            .create_async()
            .await;

        let registry = GitHubRegistry::new(&server.url());
        let result = registry.fetch_latest_release("actions/checkout").await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(RegistryError::Upstream { status: s }) if s == status
        ));
    }

    #[tokio::test]
    async fn fetch_latest_release_returns_decode_error_for_malformed_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/actions/checkout/releases/latest")
            .with_status(200)
            .with_body(r#"{"name": "no tag here"}"#)
            .create_async()
            .await;

        let registry = GitHubRegistry::new(&server.url());
        let result = registry.fetch_latest_release("actions/checkout").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::Decode(_))));
    }

    #[tokio::test]
    async fn fetch_latest_release_returns_transport_error_when_unreachable() {
        // Port 1 is reserved and refuses connections.
        let registry =
            GitHubRegistry::with_timeout("http://127.0.0.1:1", Duration::from_millis(500));

        let result = registry.fetch_latest_release("actions/checkout").await;

        assert!(matches!(result, Err(RegistryError::Transport(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_latest_release_returns_transport_error_on_request_timeout() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/repos/actions/checkout/releases/latest")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(br#"{"tag_name": "v4.1.0"}"#)
            })
            .create_async()
            .await;

        let registry = GitHubRegistry::with_timeout(&server.url(), Duration::from_millis(200));
        let result = registry.fetch_latest_release("actions/checkout").await;

        assert!(matches!(result, Err(RegistryError::Transport(_))));
    }

    #[tokio::test]
    async fn fetch_tags_returns_names_in_response_order() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/some/repo/tags")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name": "v2.3.0"}, {"name": "v2.2.0"}, {"name": "v1.0.0"}]"#)
            .create_async()
            .await;

        let registry = GitHubRegistry::new(&server.url());
        let result = registry.fetch_tags("some/repo").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec!["v2.3.0", "v2.2.0", "v1.0.0"]);
    }

    #[tokio::test]
    async fn fetch_tags_returns_empty_for_repo_without_tags() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/some/repo/tags")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let registry = GitHubRegistry::new(&server.url());
        let result = registry.fetch_tags("some/repo").await.unwrap();

        mock.assert_async().await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn fetch_tags_returns_decode_error_for_non_array_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/some/repo/tags")
            .with_status(200)
            .with_body(r#"{"message": "unexpected"}"#)
            .create_async()
            .await;

        let registry = GitHubRegistry::new(&server.url());
        let result = registry.fetch_tags("some/repo").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::Decode(_))));
    }
}
