mod channels;
mod defaults;


pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::QuizError;
use defaults::*;

/// Top-level quizcast configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Question bank and batch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default = "default_bank_path")]
    pub bank_path: String,
    /// Questions sent per run.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Advance the cursor even when some deliveries failed. When false, a
    /// batch with any failure is retried in full on the next run.
    #[serde(default = "default_true")]
    pub advance_on_partial_failure: bool,
    /// Notice sent to every destination once the bank is exhausted.
    #[serde(default = "default_exhausted_message")]
    pub exhausted_message: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            bank_path: default_bank_path(),
            batch_size: default_batch_size(),
            advance_on_partial_failure: true,
            exhausted_message: default_exhausted_message(),
        }
    }
}

/// Where the progress cursor lives.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorBackend {
    /// Plain text file holding one decimal integer (default).
    #[default]
    File,
    /// Single-row SQLite table.
    Sqlite,
}

/// Progress cursor config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorConfig {
    #[serde(default)]
    pub backend: CursorBackend,
    /// Cursor file, or SQLite database path for the `sqlite` backend.
    #[serde(default = "default_cursor_path")]
    pub path: String,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            backend: CursorBackend::default(),
            path: default_cursor_path(),
        }
    }
}

/// Logging config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for `quizcast.log`. Empty = stdout only.
    #[serde(default)]
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

impl Config {
    /// Apply `TELEGRAM_BOT_TOKEN` / `CHAT_IDS` style overrides.
    ///
    /// Empty override values are ignored.
    pub fn apply_overrides(&mut self, bot_token: Option<String>, chat_ids: Option<String>) {
        if let Some(token) = bot_token.filter(|t| !t.trim().is_empty()) {
            self.telegram.bot_token = token.trim().to_string();
        }
        if let Some(ids) = chat_ids.filter(|s| !s.trim().is_empty()) {
            self.telegram.chat_ids = parse_chat_ids(&ids);
        }
    }

    /// Expand `~/` in every configured path.
    pub fn expand_paths(&mut self) {
        self.quiz.bank_path = shellexpand(&self.quiz.bank_path);
        self.cursor.path = shellexpand(&self.cursor.path);
        if !self.logging.log_dir.is_empty() {
            self.logging.log_dir = shellexpand(&self.logging.log_dir);
        }
    }

    /// Reject values the driver cannot work with.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.quiz.batch_size == 0 {
            return Err(QuizError::Config("quiz.batch_size must be at least 1".into()));
        }
        if self.quiz.bank_path.trim().is_empty() {
            return Err(QuizError::Config("quiz.bank_path is empty".into()));
        }
        if self.cursor.path.trim().is_empty() {
            return Err(QuizError::Config("cursor.path is empty".into()));
        }
        Ok(())
    }
}

/// Parse configuration from a TOML string, without environment overrides.
pub fn from_toml(content: &str) -> Result<Config, QuizError> {
    toml::from_str(content).map_err(|e| QuizError::Config(format!("failed to parse config: {e}")))
}

/// Load configuration from a TOML file, then apply environment overrides.
///
/// Falls back to defaults if the file does not exist; this runs before any
/// subscriber is installed, so the caller reports that case. `TELEGRAM_BOT_TOKEN`
/// and `CHAT_IDS` are read here and nowhere else.
pub fn load(path: &str) -> Result<Config, QuizError> {
    let file = Path::new(path);
    let mut config = if file.exists() {
        let content = std::fs::read_to_string(file).map_err(|e| {
            QuizError::Config(format!("failed to read {}: {}", file.display(), e))
        })?;
        from_toml(&content)?
    } else {
        Config::default()
    };

    config.apply_overrides(
        std::env::var("TELEGRAM_BOT_TOKEN").ok(),
        std::env::var("CHAT_IDS").ok(),
    );
    config.expand_paths();
    config.validate()?;

    Ok(config)
}
