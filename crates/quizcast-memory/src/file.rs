//! Flat-file cursor: one decimal integer, nothing else.

use async_trait::async_trait;
use quizcast_core::{error::QuizError, traits::ProgressStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::parse_cursor;

/// Cursor persisted as a plain text file.
pub struct FileCursor {
    path: PathBuf,
}

impl FileCursor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path used for write-then-rename.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ProgressStore for FileCursor {
    async fn load(&self) -> usize {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => parse_cursor(&content, &self.path.display().to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no cursor at {}, starting from 0", self.path.display());
                0
            }
            Err(e) => {
                warn!(
                    "failed to read cursor {}: {e}, starting from 0",
                    self.path.display()
                );
                0
            }
        }
    }

    async fn save(&self, next: usize) -> Result<(), QuizError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                QuizError::Cursor(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, next.to_string())
            .await
            .map_err(|e| QuizError::Cursor(format!("failed to write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            QuizError::Cursor(format!(
                "failed to move {} → {}: {e}",
                tmp.display(),
                self.path.display()
            ))
        })?;

        debug!("cursor saved: {next} → {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file ({})", self.path.display())
    }
}
