//! Poller: fetches status changes, relays them, and keeps going through failures

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::homework::{self, SubmissionRecord};
use crate::notifier::Notifier;
use crate::practicum::StatusSource;
use crate::status;

/// Result of a single poll cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every record was translated; `notified` messages were attempted
    Completed { notified: usize },
    /// The cycle failed; `reported` is false when the error repeated the last
    /// one sent to the chat
    Failed { reported: bool },
}

/// Owns the query checkpoint and the last reported error
#[derive(Debug)]
pub struct Poller {
    source: Arc<dyn StatusSource>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    interval: Duration,
    checkpoint: u64,
    last_error: Option<String>,
}

impl Poller {
    /// Start the first query window at `initial_checkpoint`, or now if unset
    pub fn new(
        source: Arc<dyn StatusSource>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
        interval: Duration,
        initial_checkpoint: Option<u64>,
    ) -> Self {
        let checkpoint = initial_checkpoint.unwrap_or_else(|| clock.now_unix());
        Self {
            source,
            notifier,
            clock,
            interval,
            checkpoint,
            last_error: None,
        }
    }

    pub fn checkpoint(&self) -> u64 {
        self.checkpoint
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one fetch, validate, notify, advance sequence
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.relay_updates().await {
            Ok(notified) => {
                let now = self.clock.now_unix();
                self.checkpoint = self.checkpoint.max(now);
                tracing::debug!(
                    "Cycle complete: {} notification(s), checkpoint now {}",
                    notified,
                    self.checkpoint
                );
                CycleOutcome::Completed { notified }
            }
            Err(e) => {
                let reported = self.report_error(&e).await;
                CycleOutcome::Failed { reported }
            }
        }
    }

    /// Poll until `cancel` fires, sleeping the fixed interval after every cycle
    pub async fn run(&mut self, cancel: CancellationToken) {
        tracing::info!(
            "Polling every {:?}, starting from {}",
            self.interval,
            self.checkpoint
        );

        loop {
            self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }
    }

    async fn relay_updates(&self) -> crate::Result<usize> {
        let payload = self.source.fetch(self.checkpoint).await?;
        let homeworks = homework::validate(payload)?;

        if homeworks.is_empty() {
            tracing::debug!("No homework status changes since {}", self.checkpoint);
            return Ok(0);
        }

        let mut notified = 0;
        for entry in &homeworks {
            let record = SubmissionRecord::from_value(entry)?;
            let message = status::translate(&record)?;
            // Delivery failures are logged by the notifier and never abort the cycle
            let _ = self.notifier.notify(&message).await;
            notified += 1;
        }
        Ok(notified)
    }

    /// Log the error and send it to the chat unless it repeats the last one.
    /// Returns whether a chat message was attempted.
    async fn report_error(&mut self, error: &crate::HomeworkBotError) -> bool {
        let representation = error.representation();
        tracing::error!("Poll cycle failed: {}", representation);

        if self.last_error.as_deref() == Some(representation.as_str()) {
            tracing::debug!("Same error as last reported, not notifying chat");
            return false;
        }

        let _ = self.notifier.notify(&representation).await;
        self.last_error = Some(representation);
        true
    }
}
