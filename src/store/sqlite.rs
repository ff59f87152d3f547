// src/store/sqlite.rs

//! SQLite storage implementation.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::Result;
use crate::models::{CandidateEntry, Entry};
use crate::store::EntryStore;

/// Table bootstrap, applied on connect.
const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        link TEXT NOT NULL UNIQUE,
        summary TEXT,
        category TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
"#;

/// Common SELECT fields for entry queries
const SELECT_ENTRY: &str = "SELECT id, title, link, summary, category, created_at FROM entries";

/// SQLite storage backend.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database, creating file and schema when missing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Single writer: runs are serialized, and one connection keeps
        // in-memory databases coherent across statements.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    /// Apply the schema.
    async fn init(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Load all entries in insertion order.
    pub async fn all(&self) -> Result<Vec<Entry>> {
        let query = format!("{SELECT_ENTRY} ORDER BY id");
        let entries = sqlx::query_as::<_, Entry>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }
}

#[async_trait]
impl EntryStore for SqliteStore {
    async fn exists(&self, link: &str) -> Result<bool> {
        let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM entries WHERE link = $1)")
            .bind(link)
            .fetch_one(&self.pool)
            .await?;
        Ok(found)
    }

    async fn create(&self, candidate: &CandidateEntry, category: &str) -> Result<Entry> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (title, link, summary, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, link, summary, category, created_at
            "#,
        )
        .bind(&candidate.title)
        .bind(&candidate.link)
        .bind(&candidate.summary)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
