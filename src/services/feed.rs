// src/services/feed.rs

//! Feed source service.
//!
//! Fetches the configured RSS feed and turns it into candidate entries,
//! preserving the feed's own ordering.

use async_trait::async_trait;
use reqwest::Client;
use rss::Channel;

use crate::error::{AppError, Result};
use crate::models::CandidateEntry;

/// A source of candidate entries.
///
/// Each call is independent: either the whole sequence is produced or the
/// call fails. No partial results.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the feed and return its items in feed order.
    async fn fetch(&self) -> Result<Vec<CandidateEntry>>;
}

/// RSS feed source backed by HTTP.
pub struct RssFeedSource {
    client: Client,
    url: String,
}

impl RssFeedSource {
    /// Create a feed source for the given URL.
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    async fn fetch(&self) -> Result<Vec<CandidateEntry>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::fetch(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(&self.url, format!("HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::fetch(&self.url, e))?;

        let channel =
            Channel::read_from(&bytes[..]).map_err(|e| AppError::fetch(&self.url, e))?;

        tracing::debug!("Parsed {} items from {}", channel.items().len(), self.url);
        Ok(candidates_from_channel(&channel))
    }
}

/// Map channel items to candidates, dropping items without a link.
fn candidates_from_channel(channel: &Channel) -> Vec<CandidateEntry> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let link = item.link()?;
            Some(CandidateEntry {
                title: item.title().unwrap_or_default().to_string(),
                link: link.to_string(),
                summary: item.description().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Sample Feed</title>
    <link>https://example.com</link>
    <description>Sample</description>
    <item>
      <title>First</title>
      <link>https://example.com/1</link>
      <description>first summary</description>
    </item>
    <item>
      <title>No Link</title>
      <description>dropped</description>
    </item>
    <item>
      <title>Second</title>
      <link>https://example.com/2</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_candidates_preserve_feed_order() {
        let channel = Channel::from_str(SAMPLE_FEED).unwrap();
        let candidates = candidates_from_channel(&channel);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "First");
        assert_eq!(candidates[0].link, "https://example.com/1");
        assert_eq!(candidates[1].title, "Second");
    }

    #[test]
    fn test_missing_summary_defaults_to_empty() {
        let channel = Channel::from_str(SAMPLE_FEED).unwrap();
        let candidates = candidates_from_channel(&channel);

        assert_eq!(candidates[0].summary, "first summary");
        assert_eq!(candidates[1].summary, "");
    }

    #[test]
    fn test_items_without_link_are_dropped() {
        let channel = Channel::from_str(SAMPLE_FEED).unwrap();
        let candidates = candidates_from_channel(&channel);

        assert!(candidates.iter().all(|c| !c.link.is_empty()));
    }
}
