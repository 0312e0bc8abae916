//! HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with extra headers and query parameters
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse>;

    /// Send a POST request with form-encoded body
    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Client whose requests fail with a transport error after `timeout`
    pub fn with_timeout(timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                crate::HomeworkBotError::Transport(format!("Building HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse> {
        let target = reqwest::Url::parse_with_params(url, query)
            .map_err(|e| crate::HomeworkBotError::Transport(format!("Invalid URL {}: {}", url, e)))?;
        tracing::debug!("GET {}", target);

        let mut request = self.client.get(target);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await.map_err(|e| {
            crate::HomeworkBotError::Transport(format!("GET {} failed: {}", url, e))
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            crate::HomeworkBotError::Transport(format!("Reading response body: {}", e))
        })?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }

    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", redact_bot_token(url));
        let response = self
            .client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                crate::HomeworkBotError::Transport(format!(
                    "POST {} failed: {}",
                    redact_bot_token(url),
                    e.without_url()
                ))
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            crate::HomeworkBotError::Transport(format!(
                "Reading response body: {}",
                e.without_url()
            ))
        })?;

        tracing::debug!(
            "POST {} -> {} ({} bytes)",
            redact_bot_token(url),
            status,
            body.len()
        );
        Ok(HttpResponse { status, body })
    }
}

/// Telegram puts the bot token in the URL path; keep it out of logs
fn redact_bot_token(url: &str) -> String {
    match url.find("/bot") {
        Some(start) => {
            let rest = &url[start + 4..];
            let end = rest.find('/').map(|i| start + 4 + i).unwrap_or(url.len());
            format!("{}/bot<redacted>{}", &url[..start], &url[end..])
        }
        None => url.to_string(),
    }
}
