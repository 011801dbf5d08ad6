//! SQLite-backed cursor — a one-row key/value table.

use async_trait::async_trait;
use quizcast_core::{error::QuizError, shellexpand, traits::ProgressStore};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info, warn};

const CURSOR_KEY: &str = "next_index";

/// Cursor persisted in a SQLite database.
#[derive(Clone)]
pub struct SqliteCursor {
    pool: SqlitePool,
    db_path: String,
}

impl SqliteCursor {
    /// Open (or create) the database and its `progress` table.
    pub async fn open(db_path: &str) -> Result<Self, QuizError> {
        let db_path = shellexpand(db_path);

        if let Some(parent) = std::path::Path::new(&db_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| QuizError::Cursor(format!("failed to create data dir: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| QuizError::Cursor(format!("invalid db path: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|e| QuizError::Cursor(format!("failed to connect to sqlite: {e}")))?;

        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS progress (
                key TEXT PRIMARY KEY,
                next_index INTEGER NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(&pool)
        .await
        .map_err(|e| QuizError::Cursor(format!("failed to create progress table: {e}")))?;

        info!("Cursor store initialized at {db_path}");

        Ok(Self { pool, db_path })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ProgressStore for SqliteCursor {
    async fn load(&self) -> usize {
        let row: Result<Option<i64>, sqlx::Error> =
            sqlx::query_scalar("SELECT next_index FROM progress WHERE key = ?")
                .bind(CURSOR_KEY)
                .fetch_optional(&self.pool)
                .await;

        match row {
            Ok(Some(n)) => usize::try_from(n).unwrap_or_else(|_| {
                warn!("negative cursor {n} in {}, starting from 0", self.db_path);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                warn!("failed to read cursor from {}: {e}, starting from 0", self.db_path);
                0
            }
        }
    }

    async fn save(&self, next: usize) -> Result<(), QuizError> {
        let value = i64::try_from(next)
            .map_err(|_| QuizError::Cursor(format!("cursor {next} does not fit in sqlite")))?;

        sqlx::query(
            "INSERT INTO progress (key, next_index) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET \
             next_index = excluded.next_index, updated_at = datetime('now')",
        )
        .bind(CURSOR_KEY)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| QuizError::Cursor(format!("cursor write failed: {e}")))?;

        debug!("cursor saved: {next} → {}", self.db_path);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite ({})", self.db_path)
    }
}
