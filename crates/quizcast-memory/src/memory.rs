//! In-process cursor, used for dry runs and tests.

use async_trait::async_trait;
use quizcast_core::{error::QuizError, traits::ProgressStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Cursor held in memory; nothing survives the process.
#[derive(Default)]
pub struct MemoryCursor {
    value: Mutex<usize>,
    saves: AtomicUsize,
}

impl MemoryCursor {
    /// Start at `initial`.
    pub fn new(initial: usize) -> Self {
        Self {
            value: Mutex::new(initial),
            saves: AtomicUsize::new(0),
        }
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ProgressStore for MemoryCursor {
    async fn load(&self) -> usize {
        *self.value.lock().await
    }

    async fn save(&self, next: usize) -> Result<(), QuizError> {
        *self.value.lock().await = next;
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
