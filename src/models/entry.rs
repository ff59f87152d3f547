//! Feed entry data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feed item as produced by the feed source for one run.
///
/// Candidates are transient: they exist only to decide whether a
/// persisted [`Entry`] should be created for their link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    /// Item title
    pub title: String,

    /// Item link, the natural key used for deduplication
    pub link: String,

    /// Item summary (empty string if the feed omits it)
    pub summary: String,
}

/// A persisted, deduplicated feed entry.
///
/// Entries are immutable after creation. `link` is unique across the
/// whole table; `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Entry {
    /// Surrogate identifier assigned on insert
    pub id: i64,

    /// Entry title
    pub title: String,

    /// Unique link
    pub link: String,

    /// Entry summary, may be empty
    pub summary: String,

    /// Category label assigned by the classifier at creation
    pub category: String,

    /// Insert timestamp assigned by the store
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Format the entry as a notification summary line.
    pub fn summary_line(&self) -> String {
        format!("{} ({})", self.title, self.category)
    }
}
