//! Message sending: quiz polls and plain-text notices.

use super::types::{SendMessage, SendPoll, TgResponse};
use super::TelegramChannel;
use crate::utils::split_message;
use quizcast_core::error::QuizError;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Telegram's `sendMessage` text limit.
const MAX_MESSAGE_LEN: usize = 4096;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

impl TelegramChannel {
    /// Send one poll to a chat.
    pub(crate) async fn send_poll(
        &self,
        chat_id: &str,
        question: &str,
        options: &[String],
        correct_option_id: Option<usize>,
    ) -> Result<(), QuizError> {
        let body = SendPoll::new(chat_id, question, options, correct_option_id);
        self.call("sendPoll", &body).await
    }

    /// Send a plain-text message to a chat, split at Telegram's limit.
    pub(crate) async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), QuizError> {
        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let body = SendMessage {
                chat_id,
                text: chunk,
            };
            self.call("sendMessage", &body).await?;
        }
        Ok(())
    }

    /// POST a JSON body to a Bot API method and check the reply.
    async fn call<B: Serialize + ?Sized>(&self, method: &str, body: &B) -> Result<(), QuizError> {
        let url = format!("{}/{method}", self.base_url);

        let resp = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await
            // The URL carries the bot token; keep it out of logs.
            .map_err(|e| {
                QuizError::Channel(format!("telegram {method} failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        check_reply(method, status, &text)?;

        debug!("telegram {method} ok");
        Ok(())
    }
}

/// Turn an HTTP status and body into success or a channel error.
pub(crate) fn check_reply(
    method: &str,
    status: reqwest::StatusCode,
    body: &str,
) -> Result<(), QuizError> {
    let parsed: Option<TgResponse> = serde_json::from_str(body).ok();

    if let Some(reply) = parsed.as_ref().filter(|r| !r.ok) {
        let description = reply.description.as_deref().unwrap_or("no description");
        return Err(QuizError::Channel(match reply.error_code {
            Some(code) => format!("telegram {method} rejected ({code}): {description}"),
            None => format!("telegram {method} rejected: {description}"),
        }));
    }

    if !status.is_success() {
        return Err(QuizError::Channel(format!(
            "telegram {method} failed ({status}): {body}"
        )));
    }

    Ok(())
}
