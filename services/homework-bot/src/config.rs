//! Configuration types for the homework bot

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub practicum: PracticumConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Remote review API settings
#[derive(Clone, Serialize, Deserialize)]
pub struct PracticumConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token: String,
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: String::new(),
        }
    }
}

impl std::fmt::Debug for PracticumConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &redact(&self.token))
            .finish()
    }
}

/// Chat delivery settings
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_telegram_api_url(),
            bot_token: String::new(),
            chat_id: String::new(),
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("bot_token", &redact(&self.bot_token))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Poll loop timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_retry_interval")]
    pub retry_interval_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Lower bound of the first query window; the startup time when absent
    #[serde(default)]
    pub initial_from_date: Option<u64>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            retry_interval_seconds: default_retry_interval(),
            request_timeout_seconds: default_request_timeout(),
            initial_from_date: None,
        }
    }
}

/// The three secrets the bot cannot start without
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &redact(&self.practicum_token))
            .field("telegram_token", &redact(&self.telegram_token))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl Config {
    /// Override secrets with values from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first, if present.
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(crate::HomeworkBotError::Config(format!(
                    "Failed to load .env file: {}",
                    e
                )))
            }
        }
        self.apply_secrets(|name| std::env::var(name).ok());
        Ok(())
    }

    /// Override secrets using the given lookup; empty values are ignored
    pub fn apply_secrets<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |target: &mut String, var: &str| {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                tracing::debug!("Using {} from environment", var);
                *target = value;
            }
        };
        set(&mut self.practicum.token, PRACTICUM_TOKEN_VAR);
        set(&mut self.telegram.bot_token, TELEGRAM_TOKEN_VAR);
        set(&mut self.telegram.chat_id, TELEGRAM_CHAT_ID_VAR);
    }

    /// Startup precondition: all three secrets present and non-empty
    pub fn credentials(&self) -> crate::Result<Credentials> {
        let required = [
            (PRACTICUM_TOKEN_VAR, &self.practicum.token),
            (TELEGRAM_TOKEN_VAR, &self.telegram.bot_token),
            (TELEGRAM_CHAT_ID_VAR, &self.telegram.chat_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(crate::HomeworkBotError::Config(format!(
                    "{} is missing",
                    name
                )));
            }
        }

        Ok(Credentials {
            practicum_token: self.practicum.token.clone(),
            telegram_token: self.telegram.bot_token.clone(),
            chat_id: self.telegram.chat_id.clone(),
        })
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_interval() -> u64 {
    600
}

fn default_request_timeout() -> u64 {
    30
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::HomeworkBotError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        crate::HomeworkBotError::Config(format!("Failed to parse config file {:?}: {}", path, e))
    })
}
