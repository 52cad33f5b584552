use crate::types::{MarketError, RawFeedEntry, Result};
use feed_rs::parser;
use std::collections::HashSet;
use tracing::{debug, info};

pub struct FeedParser;

impl FeedParser {
    /// Parses an RSS or Atom document into raw entries, in feed order.
    ///
    /// Entries without a link are dropped, as are repeated links within the
    /// same document.
    pub fn parse_entries(content: &str) -> Result<Vec<RawFeedEntry>> {
        let content = Self::normalize_encoding(content)?;
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| MarketError::Parse(format!("Failed to parse feed: {}", e)))?;

        let mut seen_links = HashSet::new();
        let mut entries = Vec::new();

        for entry in feed.entries {
            if let Some(parsed) = Self::parse_entry(entry) {
                if seen_links.insert(parsed.link.clone()) {
                    entries.push(parsed);
                } else {
                    debug!("Skipping duplicate entry with link: {}", parsed.link);
                }
            }
        }

        info!("Parsed feed with {} entries", entries.len());
        Ok(entries)
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> Option<RawFeedEntry> {
        let link = entry.links.first()?.href.trim().to_string();
        if link.is_empty() {
            return None;
        }

        let title = entry.title.map(|t| t.content).unwrap_or_default();

        // Keep the feed's own date text; it is displayed, never compared
        let published = entry
            .published
            .or(entry.updated)
            .map(|dt| dt.to_rfc2822());

        // Prefer the summary, fall back to inline content
        let summary = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body));

        Some(RawFeedEntry {
            title,
            link,
            published,
            summary,
        })
    }

    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();

        content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<rdf:rdf")
            || content_lower.contains("<channel")
    }

    pub fn normalize_encoding(content: &str) -> Result<String> {
        let normalized = content
            .trim_start_matches('\u{feff}')
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .trim()
            .to_string();

        if normalized.is_empty() {
            return Err(MarketError::Parse("Empty content after normalization".to_string()));
        }

        Ok(normalized)
    }
}
