use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
// Shared contract types live in the interfaces crate
pub use interfaces::defs::{PriceQuote, PriceSource, RawFeedEntry, StructuredFields};
pub use interfaces::empty::EmptyPriceSource;

/// Fixed GPU model columns of the price table, in display order.
pub const GPU_MODELS: [&str; 3] = ["H100 (80GB)", "A100 (80GB)", "V100 (16GB)"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub provider: String,
    /// One entry per `GPU_MODELS` column, same order.
    pub prices: Vec<Option<f64>>,
    pub region: String,
    pub focus: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub models: Vec<String>,
    pub rows: Vec<PriceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub link: String,
    pub published: String,
    pub summary: String,
    pub provider: String,
    pub tags: BTreeSet<String>,
    pub location: Option<String>,
    pub actors: BTreeSet<String>,
}

impl ArticleRecord {
    /// Text handed to the extraction collaborator.
    pub fn extraction_text(&self) -> String {
        format!("{}\n{}", self.title, self.summary)
    }

    /// Returns a new record with `fields` merged in.
    ///
    /// Extracted values win over what the record already holds (keyword tags
    /// included) only when they are non-empty. An empty extracted field,
    /// such as every field of the fallback, keeps the prior value.
    pub fn with_enrichment(&self, fields: &StructuredFields) -> Self {
        let summary = Some(fields.summary.trim())
            .filter(|s| !s.is_empty())
            .map_or_else(|| self.summary.clone(), |s| s.to_string());

        let location = Some(fields.location.trim())
            .filter(|loc| !loc.is_empty())
            .map(|loc| loc.to_string())
            .or_else(|| self.location.clone());

        Self {
            title: self.title.clone(),
            link: self.link.clone(),
            published: self.published.clone(),
            summary,
            provider: self.provider.clone(),
            tags: merge_set(&self.tags, &fields.tags),
            location,
            actors: merge_set(&self.actors, &fields.actors),
        }
    }
}

fn merge_set(prior: &BTreeSet<String>, extracted: &[String]) -> BTreeSet<String> {
    let extracted = clean_set(extracted);
    if extracted.is_empty() {
        prior.clone()
    } else {
        extracted
    }
}

fn clean_set(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .collect()
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "GPU-Market-Dashboard/1.0".to_string(),
            timeout_seconds: 30,
            max_retries: 1,
            retry_delay_seconds: 2,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    pub url: String,
    pub success: bool,
    pub error: Option<String>,
    pub response_time_ms: u64,
    pub http_status: Option<u16>,
    pub content: Option<String>, // RSS/XML content
}

impl FetchResult {
    pub(crate) fn failed(url: &str, error: String, response_time_ms: u64, http_status: Option<u16>) -> Self {
        Self {
            url: url.to_string(),
            success: false,
            error: Some(error),
            response_time_ms,
            http_status,
            content: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, MarketError>;
