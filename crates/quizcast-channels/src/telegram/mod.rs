//! Telegram Bot API channel.
//!
//! Questions go out through `sendPoll`, notices through `sendMessage`.
//! Docs: <https://core.telegram.org/bots/api>

mod send;
pub(crate) mod types;


use async_trait::async_trait;
use quizcast_core::{config::TelegramConfig, error::QuizError, traits::Delivery};
use tracing::{error, info, warn};

/// Telegram channel using the Bot API.
pub struct TelegramChannel {
    config: TelegramConfig,
    client: reqwest::Client,
    base_url: String,
}

impl TelegramChannel {
    /// Create a new Telegram channel from config.
    pub fn new(config: TelegramConfig) -> Self {
        let base_url = format!(
            "{}/bot{}",
            config.api_base.trim_end_matches('/'),
            config.bot_token.trim()
        );
        Self {
            config,
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Refuse to send without a token.
    fn require_token(&self) -> Result<(), QuizError> {
        if self.config.has_token() {
            Ok(())
        } else {
            error!(
                "telegram bot_token is not set \
                 (config telegram.bot_token or TELEGRAM_BOT_TOKEN)"
            );
            Err(QuizError::Channel("telegram bot_token is not set".into()))
        }
    }
}

#[async_trait]
impl Delivery for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_quiz(
        &self,
        destination: &str,
        prompt: &str,
        options: &[String],
        correct_index: Option<usize>,
    ) -> Result<(), QuizError> {
        self.require_token()?;
        if correct_index.is_none() {
            warn!("no correct option for \"{prompt}\", sending as a regular poll");
        }
        match self
            .send_poll(destination, prompt, options, correct_index)
            .await
        {
            Ok(()) => {
                info!("poll sent to {destination}: {prompt}");
                Ok(())
            }
            Err(e) => {
                warn!("error sending poll to {destination}: {e}");
                Err(e)
            }
        }
    }

    async fn send_notice(&self, destination: &str, text: &str) -> Result<(), QuizError> {
        self.require_token()?;
        match self.send_text(destination, text).await {
            Ok(()) => {
                info!("message sent to {destination}: {text}");
                Ok(())
            }
            Err(e) => {
                warn!("error sending message to {destination}: {e}");
                Err(e)
            }
        }
    }
}
