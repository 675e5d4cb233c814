//! SQLite-backed trending store implementation.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};

use super::{stored_poster_url, TrendingEntry, TrendingError, TrendingStore};
use crate::external_catalog::Movie;

/// SQLite-backed trending store.
pub struct SqliteTrendingStore {
    conn: Mutex<Connection>,
    image_base_url: String,
}

impl SqliteTrendingStore {
    /// Create a new SQLite store, creating the database file and table if needed.
    pub fn new(path: &Path, image_base_url: &str) -> Result<Self, TrendingError> {
        let conn = Connection::open(path).map_err(|e| TrendingError::Database(e.to_string()))?;
        Self::from_connection(conn, image_base_url)
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory(image_base_url: &str) -> Result<Self, TrendingError> {
        let conn =
            Connection::open_in_memory().map_err(|e| TrendingError::Database(e.to_string()))?;
        Self::from_connection(conn, image_base_url)
    }

    fn from_connection(conn: Connection, image_base_url: &str) -> Result<Self, TrendingError> {
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            image_base_url: image_base_url.to_string(),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), TrendingError> {
        conn.execute_batch(
            r#"
            -- One row per distinct search term
            CREATE TABLE IF NOT EXISTS search_metrics (
                id TEXT PRIMARY KEY,
                search_term TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                movie_id INTEGER NOT NULL,
                poster_url TEXT NOT NULL,
                count INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_search_metrics_count ON search_metrics(count);
            "#,
        )
        .map_err(|e| TrendingError::Database(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl TrendingStore for SqliteTrendingStore {
    async fn increment_search_count(
        &self,
        term: &str,
        movie: &Movie,
    ) -> Result<(), TrendingError> {
        let now = Utc::now().to_rfc3339();
        let id = uuid::Uuid::new_v4().to_string();
        let poster_url = stored_poster_url(movie, &self.image_base_url);

        let conn = self
            .conn
            .lock()
            .map_err(|e| TrendingError::Database(e.to_string()))?;

        conn.execute(
            "INSERT INTO search_metrics
                (id, search_term, title, movie_id, poster_url, count, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
             ON CONFLICT(search_term) DO UPDATE SET
                count = count + 1,
                updated_at = excluded.updated_at",
            params![id, term, movie.title, movie.id as i64, poster_url, now],
        )
        .map_err(|e| TrendingError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list_top_trending(&self, limit: u32) -> Result<Vec<TrendingEntry>, TrendingError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| TrendingError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, search_term, title, movie_id, poster_url, count
                 FROM search_metrics
                 ORDER BY count DESC, updated_at DESC, search_term ASC
                 LIMIT ?",
            )
            .map_err(|e| TrendingError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit], |row| {
                let movie_id: i64 = row.get(3)?;
                let count: i64 = row.get(5)?;
                Ok(TrendingEntry {
                    id: row.get(0)?,
                    search_term: row.get(1)?,
                    title: row.get(2)?,
                    movie_id: movie_id as u64,
                    poster_url: row.get(4)?,
                    search_count: count as u64,
                })
            })
            .map_err(|e| TrendingError::Database(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| TrendingError::Database(e.to_string()))?);
        }
        Ok(entries)
    }
}
