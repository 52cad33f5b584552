use crate::traits::FeedSource;
use crate::types::{FetchConfig, RawFeedEntry, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

/// Feed source backed by HTTP retrieval and RSS/Atom parsing
pub struct RssFeedSource {
    fetcher: Fetcher,
}

impl RssFeedSource {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
        })
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<RawFeedEntry>> {
        let fetch_result = self.fetcher.fetch_feed(url).await?;

        if !fetch_result.success {
            let error_msg = fetch_result.error.unwrap_or_else(|| "Fetch failed".to_string());
            warn!(
                "Feed {} unavailable after {}ms (status {:?}): {}",
                url, fetch_result.response_time_ms, fetch_result.http_status, error_msg
            );
            return Ok(Vec::new());
        }

        debug!(
            "Feed {} answered {:?} in {}ms",
            url, fetch_result.http_status, fetch_result.response_time_ms
        );

        let content = match fetch_result.content {
            Some(content) => content,
            None => {
                warn!("No content returned for feed {}", url);
                return Ok(Vec::new());
            }
        };

        if !FeedParser::is_valid_feed_content(&content) {
            warn!("Content at {} does not look like a feed", url);
            return Ok(Vec::new());
        }

        FeedParser::parse_entries(&content)
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    fn source_name(&self) -> String {
        format!("RSS ({})", self.fetcher.config().user_agent)
    }

    async fn fetch_feed(&self, url: &str) -> Vec<RawFeedEntry> {
        match self.try_fetch(url).await {
            Ok(entries) => {
                info!("Pulled {} entries from {}", entries.len(), url);
                entries
            }
            Err(e) => {
                error!("Failed to read feed {}: {}", url, e);
                Vec::new()
            }
        }
    }
}
