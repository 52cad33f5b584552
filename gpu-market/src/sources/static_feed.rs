use crate::traits::FeedSource;
use crate::types::RawFeedEntry;
use crate::FeedParser;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Feed source serving documents held in memory, keyed by URL.
///
/// Documents go through the same parser as fetched feeds, so this source
/// behaves like `RssFeedSource` without touching the network.
#[derive(Default)]
pub struct StaticFeedSource {
    documents: HashMap<String, String>,
}

impl StaticFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: &str, document: &str) -> Self {
        self.documents.insert(url.to_string(), document.to_string());
        self
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    fn source_name(&self) -> String {
        format!("Static feeds ({} documents)", self.documents.len())
    }

    async fn fetch_feed(&self, url: &str) -> Vec<RawFeedEntry> {
        let Some(document) = self.documents.get(url) else {
            debug!("No static document for {}", url);
            return Vec::new();
        };

        FeedParser::parse_entries(document).unwrap_or_else(|e| {
            warn!("Static document for {} is not a feed: {}", url, e);
            Vec::new()
        })
    }
}
