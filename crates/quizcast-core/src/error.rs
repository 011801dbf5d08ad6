use thiserror::Error;

/// Top-level error type for quizcast.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// The question bank could not be read.
    #[error("question bank error: {0}")]
    Bank(String),

    /// Error from a delivery channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Progress cursor could not be persisted or opened.
    #[error("cursor error: {0}")]
    Cursor(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
