use serde::{Deserialize, Serialize};

use super::defaults::default_api_base;

/// Telegram bot config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token. Overridden by `TELEGRAM_BOT_TOKEN`.
    #[serde(default)]
    pub bot_token: String,
    /// Destination chat ids. Overridden by `CHAT_IDS` (comma-separated).
    #[serde(default)]
    pub chat_ids: Vec<String>,
    /// Bot API base URL, without the `/bot<token>` suffix.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_ids: Vec::new(),
            api_base: default_api_base(),
        }
    }
}

impl TelegramConfig {
    /// Whether a bot token is present.
    pub fn has_token(&self) -> bool {
        !self.bot_token.trim().is_empty()
    }

    /// Trimmed, non-empty, de-duplicated chat ids in first-seen order.
    pub fn destinations(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.chat_ids.len());
        for id in &self.chat_ids {
            let id = id.trim();
            if id.is_empty() || out.iter().any(|seen| seen == id) {
                continue;
            }
            out.push(id.to_string());
        }
        out
    }
}

/// Split a comma-separated `CHAT_IDS` value.
pub fn parse_chat_ids(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}
