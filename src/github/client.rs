// GitHub API HTTP client.
// Handles authentication, rate limiting, cancellation, and response checks.

use std::sync::Mutex;

use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::error::{HubseekError, Result};
use crate::request::RequestGuard;

use super::types::RateLimit;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with optional authentication and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a new client. A bearer token raises the rate limit ceiling;
    /// without one the unauthenticated quota applies.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| HubseekError::Other(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("hubseek"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(HubseekError::Network)?;

        Ok(Self {
            client,
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Create a client from the optional GITHUB_TOKEN environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN").ok();
        Self::new(token.as_deref())
    }

    /// Latest rate limit snapshot observed on a response.
    pub fn rate_limit(&self) -> RateLimit {
        *self.rate_limit.lock().expect("rate limit lock poisoned")
    }

    /// Make a GET request to the GitHub API.
    pub(crate) async fn get(&self, endpoint: &str, guard: &RequestGuard) -> Result<Response> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        self.execute(self.client.get(&url), guard).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
        guard: &RequestGuard,
    ) -> Result<Response> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        self.execute(self.client.get(&url).query(params), guard)
            .await
    }

    /// Send a request, racing it against the guard's cancellation token.
    async fn execute(&self, request: RequestBuilder, guard: &RequestGuard) -> Result<Response> {
        if guard.is_cancelled() {
            return Err(HubseekError::Cancelled);
        }

        let response = tokio::select! {
            biased;

            _ = guard.cancelled() => {
                debug!("request superseded before the response arrived");
                return Err(HubseekError::Cancelled);
            }
            result = request.send() => result.map_err(HubseekError::Network)?,
        };

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let mut rate_limit = self.rate_limit.lock().expect("rate limit lock poisoned");

        if let Some(limit) = header_u64(response, "x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header_u64(response, "x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header_u64(response, "x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => Ok(response),
            StatusCode::UNAUTHORIZED => Err(HubseekError::Unauthorized),
            StatusCode::NOT_FOUND => {
                let path = response.url().path().to_string();
                Err(HubseekError::NotFound(path))
            }
            StatusCode::FORBIDDEN => {
                // A 403 only means rate limiting when the quota is exhausted
                let rate_limit = self.rate_limit();
                if rate_limit.remaining == 0 {
                    Err(HubseekError::RateLimited {
                        reset_at: format_reset(rate_limit.reset),
                    })
                } else {
                    Err(HubseekError::Other(format!(
                        "forbidden: {}",
                        response.text().await.unwrap_or_default()
                    )))
                }
            }
            status => Err(HubseekError::Other(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ))),
        }
    }
}

/// Parse a numeric response header, ignoring anything malformed.
fn header_u64(response: &Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Render a rate limit reset epoch as a wall-clock time.
fn format_reset(reset: u64) -> String {
    chrono::DateTime::from_timestamp(reset as i64, 0)
        .map(|dt| dt.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_without_token() {
        assert!(GitHubClient::new(None).is_ok());
    }

    #[test]
    fn test_client_rejects_malformed_token() {
        // Header values cannot contain control characters
        assert!(GitHubClient::new(Some("bad\ntoken")).is_err());
    }

    #[test]
    fn test_format_reset() {
        assert_eq!(format_reset(0), "00:00:00 UTC");
        assert_eq!(format_reset(1_700_000_000), "22:13:20 UTC");
    }

    #[test]
    fn test_rate_limit_starts_empty() {
        let client = GitHubClient::new(None).unwrap();
        let rate_limit = client.rate_limit();
        assert_eq!(rate_limit.limit, 0);
        assert_eq!(rate_limit.remaining, 0);
    }
}
