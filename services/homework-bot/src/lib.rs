//! Homework bot - review status relay
//!
//! Polls the homework review API for status changes and forwards them to a
//! Telegram chat. Failures are reported to the same chat, once per distinct
//! error, and the loop keeps polling on a fixed interval.

pub mod clock;
pub mod config;
pub mod error;
pub mod homework;
pub mod io;
pub mod notifier;
pub mod poller;
pub mod practicum;
pub mod status;
pub mod telegram;

pub use config::{load_config, Config, Credentials};
pub use error::{HomeworkBotError, Result};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::clock::{Clock, SystemClock};
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::Notifier;
use crate::poller::{CycleOutcome, Poller};
use crate::practicum::PracticumClient;
use crate::telegram::TelegramClient;

/// Wires the API client, chat client and poller from a [`Config`]
pub struct HomeworkBotBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    clock: Arc<dyn Clock>,
}

impl HomeworkBotBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use the given HTTP client instead of reqwest
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Check credentials and assemble the bot.
    ///
    /// Fails with [`HomeworkBotError::Config`] before any request is made when
    /// a credential is missing.
    pub fn build(self) -> Result<HomeworkBot> {
        let credentials = self.config.credentials()?;

        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::with_timeout(Duration::from_secs(
                self.config.polling.request_timeout_seconds,
            ))?),
        };

        let source = Arc::new(PracticumClient::new(
            &self.config.practicum.endpoint,
            &credentials.practicum_token,
            Arc::clone(&http),
        ));
        let chat = Arc::new(TelegramClient::new(
            &self.config.telegram.api_url,
            &credentials.telegram_token,
            http,
        ));
        let notifier = Notifier::new(&credentials.chat_id, chat);

        let poller = Poller::new(
            source,
            notifier,
            self.clock,
            Duration::from_secs(self.config.polling.retry_interval_seconds),
            self.config.polling.initial_from_date,
        );

        Ok(HomeworkBot {
            poller,
            cancel: CancellationToken::new(),
        })
    }
}

/// A configured bot ready to poll
#[derive(Debug)]
pub struct HomeworkBot {
    poller: Poller,
    cancel: CancellationToken,
}

impl HomeworkBot {
    /// Token that stops [`HomeworkBot::start`] after the current cycle
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    /// Run a single poll cycle without sleeping
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.poller.run_cycle().await
    }

    /// Poll until Ctrl-C or the cancellation token fires
    pub async fn start(mut self) -> Result<()> {
        let cancel_for_signal = self.cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    cancel_for_signal.cancel();
                }
                Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
            }
        });

        tracing::info!("Homework bot started");
        self.poller.run(self.cancel.clone()).await;
        tracing::info!("Homework bot stopped");

        Ok(())
    }
}
