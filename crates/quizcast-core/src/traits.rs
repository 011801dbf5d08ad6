use crate::{error::QuizError, question::QuestionRecord};
use async_trait::async_trait;

/// Delivery collaborator — where quiz polls and notices go.
///
/// Implementations log their own failures. Callers treat every call as
/// best-effort: an `Err` is counted, never retried.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Send one question as a poll to a destination.
    ///
    /// `correct_index` is `None` when the bank declared an answer letter that
    /// matched no option; such questions cannot be scored.
    async fn send_quiz(
        &self,
        destination: &str,
        prompt: &str,
        options: &[String],
        correct_index: Option<usize>,
    ) -> Result<(), QuizError>;

    /// Send a plain-text notice to a destination.
    async fn send_notice(&self, destination: &str, text: &str) -> Result<(), QuizError>;

    /// Convenience wrapper around [`Delivery::send_quiz`].
    async fn send_question(
        &self,
        destination: &str,
        question: &QuestionRecord,
    ) -> Result<(), QuizError> {
        self.send_quiz(
            destination,
            &question.prompt,
            &question.options,
            question.correct_index,
        )
        .await
    }
}

/// Persisted progress cursor — the index of the next unsent question.
///
/// There is no locking. Runs sharing one store must be serialized by the
/// caller (e.g. a single cron entry); concurrent runs can lose updates.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Read the cursor. Missing or unparsable state reads as 0.
    async fn load(&self) -> usize;

    /// Replace the stored cursor with `next`.
    async fn save(&self, next: usize) -> Result<(), QuizError>;

    /// Backend name for status output.
    fn describe(&self) -> String;
}
