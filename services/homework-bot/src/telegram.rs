//! Telegram Bot API client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::io::HttpClient;
use crate::notifier::ChatClient;

/// Subset of the Bot API response envelope we look at
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages through `sendMessage`
pub struct TelegramClient {
    send_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient").finish_non_exhaustive()
    }
}

impl TelegramClient {
    pub fn new(api_url: &str, bot_token: &str, http: Arc<dyn HttpClient>) -> Self {
        let send_url = format!(
            "{}/bot{}/sendMessage",
            api_url.trim_end_matches('/'),
            bot_token
        );
        tracing::debug!("Created TelegramClient for {}", api_url);
        Self { send_url, http }
    }
}

#[async_trait]
impl ChatClient for TelegramClient {
    async fn send(&self, chat_id: &str, text: &str) -> crate::Result<()> {
        let params = [("chat_id", chat_id), ("text", text)];

        tracing::debug!("Sending Telegram message to chat {}", chat_id);

        let response = self.http.post_form(&self.send_url, &params).await?;

        if response.status != 200 {
            return Err(crate::HomeworkBotError::Notifier(format!(
                "Telegram API returned status {}: {}",
                response.status, response.body
            )));
        }

        let parsed: TelegramResponse = serde_json::from_str(&response.body).map_err(|e| {
            crate::HomeworkBotError::Notifier(format!("Unreadable Telegram response: {}", e))
        })?;
        if !parsed.ok {
            return Err(crate::HomeworkBotError::Notifier(format!(
                "Telegram rejected message: {}",
                parsed.description.unwrap_or_default()
            )));
        }

        tracing::debug!("Telegram message sent successfully");
        Ok(())
    }
}
