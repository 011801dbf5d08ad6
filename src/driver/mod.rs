//! Driver — one run: read the cursor, deliver the next batch, advance.
//!
//! Deliveries are sequential, one call per (question, destination) pair,
//! with no retries. A failed call is counted and the run moves on.

mod batch;

#[cfg(test)]
mod tests;

pub use batch::{select_batch, Batch};

use quizcast_core::{
    config::Config,
    error::QuizError,
    question::QuestionRecord,
    traits::{Delivery, ProgressStore},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Per-run settings, taken from [`Config`].
#[derive(Debug, Clone)]
pub struct DriverSettings {
    pub destinations: Vec<String>,
    pub batch_size: usize,
    pub advance_on_partial_failure: bool,
    pub exhausted_message: String,
}

impl DriverSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            destinations: cfg.telegram.destinations(),
            batch_size: cfg.quiz.batch_size,
            advance_on_partial_failure: cfg.quiz.advance_on_partial_failure,
            exhausted_message: cfg.quiz.exhausted_message.clone(),
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A batch `start..end` was attempted.
    Sent {
        start: usize,
        end: usize,
        delivered: usize,
        failed: usize,
        /// Whether `end` was persisted as the new cursor.
        advanced: bool,
    },
    /// The bank was already exhausted; the notice went out.
    Exhausted { notified: usize, failed: usize },
}

/// Cursor position relative to the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub cursor: usize,
    pub total: usize,
}

impl Progress {
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.cursor)
    }
}

/// Ties a parsed bank to a cursor store and a delivery channel.
pub struct Driver {
    bank: Vec<QuestionRecord>,
    store: Arc<dyn ProgressStore>,
    delivery: Arc<dyn Delivery>,
    settings: DriverSettings,
}

impl Driver {
    pub fn new(
        bank: Vec<QuestionRecord>,
        store: Arc<dyn ProgressStore>,
        delivery: Arc<dyn Delivery>,
        settings: DriverSettings,
    ) -> Self {
        Self {
            bank,
            store,
            delivery,
            settings,
        }
    }

    pub fn bank(&self) -> &[QuestionRecord] {
        &self.bank
    }

    /// Current cursor and bank size.
    pub async fn progress(&self) -> Progress {
        Progress {
            cursor: self.store.load().await,
            total: self.bank.len(),
        }
    }

    /// Deliver the next batch, or the exhaustion notice.
    ///
    /// Requires at least one destination: with none it returns
    /// `QuizError::Config` and leaves the cursor where it was.
    ///
    /// Otherwise only a failure to persist the cursor is returned as an
    /// error; delivery failures are counted in the outcome.
    pub async fn run_once(&self) -> Result<RunOutcome, QuizError> {
        if self.settings.destinations.is_empty() {
            return Err(QuizError::Config(
                "no destinations configured (telegram.chat_ids or CHAT_IDS)".into(),
            ));
        }

        let cursor = self.store.load().await;
        let total = self.bank.len();

        match select_batch(total, cursor, self.settings.batch_size) {
            Batch::Exhausted => {
                info!("All questions have been sent ({cursor}/{total}).");
                let (notified, failed) = self.notify_exhausted().await;
                Ok(RunOutcome::Exhausted { notified, failed })
            }
            Batch::Range { start, end } => {
                info!(
                    "sending questions {} to {end} of {total} to {} destination(s) via {}",
                    start + 1,
                    self.settings.destinations.len(),
                    self.delivery.name()
                );
                let (delivered, failed) = self.deliver(&self.bank[start..end]).await;

                let advanced = failed == 0 || self.settings.advance_on_partial_failure;
                if advanced {
                    self.store.save(end).await?;
                    if failed > 0 {
                        warn!("{failed} delivery(ies) failed; cursor advanced anyway");
                    }
                    info!("Successfully sent questions {} to {end}.", start + 1);
                } else {
                    warn!(
                        "{failed} delivery(ies) failed; cursor kept at {start}, \
                         batch will be retried next run"
                    );
                }

                Ok(RunOutcome::Sent {
                    start,
                    end,
                    delivered,
                    failed,
                    advanced,
                })
            }
        }
    }

    /// Overwrite the cursor, clamped to the bank size.
    pub async fn reset(&self, to: usize) -> Result<usize, QuizError> {
        let next = to.min(self.bank.len());
        self.store.save(next).await?;
        info!("cursor reset to {next}");
        Ok(next)
    }

    async fn deliver(&self, batch: &[QuestionRecord]) -> (usize, usize) {
        let mut delivered = 0;
        let mut failed = 0;
        for question in batch {
            for destination in &self.settings.destinations {
                match self.delivery.send_question(destination, question).await {
                    Ok(()) => delivered += 1,
                    Err(_) => failed += 1,
                }
            }
        }
        (delivered, failed)
    }

    async fn notify_exhausted(&self) -> (usize, usize) {
        let mut notified = 0;
        let mut failed = 0;
        for destination in &self.settings.destinations {
            match self
                .delivery
                .send_notice(destination, &self.settings.exhausted_message)
                .await
            {
                Ok(()) => notified += 1,
                Err(_) => failed += 1,
            }
        }
        (notified, failed)
    }
}
