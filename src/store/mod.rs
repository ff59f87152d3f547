//! Persistence for ingested entries.
//!
//! One table, `entries`, holds every feed item ever ingested. The `link`
//! column carries a UNIQUE constraint so a duplicate insert fails at the
//! schema level instead of racing the application-level existence check.

pub mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CandidateEntry, Entry};

// Re-export for convenience
pub use sqlite::SqliteStore;

/// Trait for entry storage backends.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// True iff an entry with that link was previously persisted.
    async fn exists(&self, link: &str) -> Result<bool>;

    /// Persist a new entry with a fresh id and store-assigned timestamp.
    ///
    /// The caller is expected to have checked [`exists`](Self::exists)
    /// first; the schema-level uniqueness of `link` is the backstop.
    async fn create(&self, candidate: &CandidateEntry, category: &str) -> Result<Entry>;

    /// Total number of persisted entries.
    async fn count(&self) -> Result<i64>;
}
