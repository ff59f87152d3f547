//! Pipeline entry points for ingestion runs.
//!
//! - `ingest`: one fetch → dedupe → classify → persist → notify pass

pub mod ingest;

pub use ingest::{IngestionJob, NOTIFICATION_SUBJECT, RunOutcome};
