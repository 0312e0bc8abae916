//! Homework review API client

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::io::HttpClient;

/// Longest slice of an error body written to the debug log
const MAX_LOGGED_BODY_CHARS: usize = 512;

/// Source of homework status updates
#[async_trait]
pub trait StatusSource: Send + Sync + std::fmt::Debug {
    /// Fetch every status change since `from_date` (Unix seconds).
    ///
    /// Returns the parsed body without checking its shape.
    async fn fetch(&self, from_date: u64) -> crate::Result<Value>;
}

/// Client for the Practicum homework statuses endpoint
pub struct PracticumClient {
    endpoint: String,
    token: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: &str, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created PracticumClient for {}", endpoint);
        Self {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            http,
        }
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: u64) -> crate::Result<Value> {
        let authorization = format!("OAuth {}", self.token);
        let from_date = from_date.to_string();

        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", authorization.as_str())],
                &[("from_date", from_date.as_str())],
            )
            .await?;

        if !response.is_success() {
            tracing::debug!(
                "API error body (status {}): {}",
                response.status,
                truncate_body(&response.body)
            );
            return Err(crate::HomeworkBotError::RemoteApi {
                status: response.status,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            crate::HomeworkBotError::MalformedResponse(format!("body is not JSON: {}", e))
        })
    }
}

fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(MAX_LOGGED_BODY_CHARS) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}
