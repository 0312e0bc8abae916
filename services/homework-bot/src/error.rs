//! Error types for the homework bot

/// Errors that can occur in the homework bot
#[derive(Debug, thiserror::Error)]
pub enum HomeworkBotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("API responded with status {status}")]
    RemoteApi { status: u16 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("Notifier error: {0}")]
    Notifier(String),
}

impl HomeworkBotError {
    /// Name of the error class, stable across messages
    pub fn kind(&self) -> &'static str {
        match self {
            HomeworkBotError::Config(_) => "FatalConfigError",
            HomeworkBotError::Transport(_) => "TransportError",
            HomeworkBotError::RemoteApi { .. } => "RemoteApiError",
            HomeworkBotError::MalformedResponse(_) => "MalformedResponse",
            HomeworkBotError::UnknownStatus(_) => "UnknownStatus",
            HomeworkBotError::Notifier(_) => "NotifierError",
        }
    }

    /// Kind plus message. Two errors with the same representation are
    /// reported to the chat only once in a row.
    pub fn representation(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }

    /// Only a broken configuration stops the bot; everything else is retried
    pub fn is_fatal(&self) -> bool {
        matches!(self, HomeworkBotError::Config(_))
    }
}

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, HomeworkBotError>;
