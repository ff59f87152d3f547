//! External collaborators behind narrow interfaces.
//!
//! - `feed`: fetch and parse the configured RSS feed
//! - `classify`: label entries through a chat-completion endpoint
//! - `notify`: send the per-run summary email

pub mod classify;
pub mod feed;
pub mod notify;

pub use classify::{Classifier, FALLBACK_CATEGORY, OpenAiClassifier};
pub use feed::{FeedSource, RssFeedSource};
pub use notify::{Notifier, SmtpNotifier};
