use crate::types::{RawFeedEntry, Result};
use async_trait::async_trait;

/// Trait for pulling raw entries from a news feed (RSS, Atom, ...)
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable name for this source
    fn source_name(&self) -> String;

    /// Fetch the entries published at `url`, in feed order.
    /// Any failure (network, HTTP status, malformed XML) yields an empty list.
    async fn fetch_feed(&self, url: &str) -> Vec<RawFeedEntry>;
}

/// Trait for the external text-understanding capability
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Get the name of this extractor
    fn extractor_name(&self) -> String;

    /// Send article text and return the raw response, which is expected to be
    /// a JSON object with the keys summary, location, tags and actors.
    async fn extract(&self, text: &str) -> Result<String>;
}
