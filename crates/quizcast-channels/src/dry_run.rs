//! Delivery that only logs what would have been sent.

use async_trait::async_trait;
use quizcast_core::{error::QuizError, traits::Delivery};
use tracing::info;

/// Logs every poll and notice instead of sending it.
#[derive(Debug, Default)]
pub struct DryRunChannel;

#[async_trait]
impl Delivery for DryRunChannel {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn send_quiz(
        &self,
        destination: &str,
        prompt: &str,
        options: &[String],
        correct_index: Option<usize>,
    ) -> Result<(), QuizError> {
        let answer = correct_index
            .and_then(|i| options.get(i))
            .map(String::as_str)
            .unwrap_or("<none>");
        info!(
            "[dry-run] poll to {destination}: {prompt} | {} | answer: {answer}",
            options.join(" / ")
        );
        Ok(())
    }

    async fn send_notice(&self, destination: &str, text: &str) -> Result<(), QuizError> {
        info!("[dry-run] message to {destination}: {text}");
        Ok(())
    }
}
