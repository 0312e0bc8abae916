//! Chat delivery for status and error messages

use std::sync::Arc;

use async_trait::async_trait;

/// Something that can post a text message to a chat
#[async_trait]
pub trait ChatClient: Send + Sync + std::fmt::Debug {
    /// Send `text` to `chat_id`
    async fn send(&self, chat_id: &str, text: &str) -> crate::Result<()>;
}

/// Delivers messages to the one configured chat.
///
/// Failures are logged here and handed back so callers can observe them;
/// the poll loop never lets them change what it does next.
#[derive(Debug, Clone)]
pub struct Notifier {
    chat_id: String,
    client: Arc<dyn ChatClient>,
}

impl Notifier {
    pub fn new(chat_id: &str, client: Arc<dyn ChatClient>) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            client,
        }
    }

    pub async fn notify(&self, text: &str) -> crate::Result<()> {
        match self.client.send(&self.chat_id, text).await {
            Ok(()) => {
                tracing::info!("Message sent to chat {}", self.chat_id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to send message to chat {}: {}", self.chat_id, e);
                Err(e)
            }
        }
    }
}
