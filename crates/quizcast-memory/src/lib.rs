//! # quizcast-memory
//!
//! Progress cursor stores for quizcast: a plain text file (default), a
//! single-row SQLite table, and an in-process store.

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileCursor;
pub use memory::MemoryCursor;
pub use sqlite::SqliteCursor;

use quizcast_core::{
    config::{CursorBackend, CursorConfig},
    error::QuizError,
    traits::ProgressStore,
};
use tracing::warn;

/// Open the cursor store selected by configuration.
pub async fn open_store(config: &CursorConfig) -> Result<Box<dyn ProgressStore>, QuizError> {
    match config.backend {
        CursorBackend::File => Ok(Box::new(FileCursor::new(&config.path))),
        CursorBackend::Sqlite => Ok(Box::new(SqliteCursor::open(&config.path).await?)),
    }
}

/// Interpret persisted cursor text. Anything but a non-negative decimal
/// integer reads as 0.
pub(crate) fn parse_cursor(content: &str, source: &str) -> usize {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<usize>() {
        Ok(n) => n,
        Err(e) => {
            warn!("unparsable cursor in {source} ({trimmed:?}: {e}), starting from 0");
            0
        }
    }
}
