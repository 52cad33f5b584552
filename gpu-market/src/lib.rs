pub mod types;
pub mod providers;
pub mod pricing;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod news;
pub mod llm_adapter;
pub mod enrichment;
pub mod filter;
pub mod presentation;
pub mod dashboard;
pub mod utils;

pub use types::*;
pub use providers::ProviderId;
pub use pricing::{build_price_table, StaticPriceSource};
pub use traits::{Extractor, FeedSource};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use sources::{RssFeedSource, StaticFeedSource};
pub use news::{derive_keyword_tags, normalize_feed, NewsService};
pub use llm_adapter::{ExtractionConfig, MockExtractor, OpenAiExtractor};
pub use enrichment::{Enricher, EnrichmentConfig};
pub use filter::{compute_frequency, filter_articles, FilterCriteria, FilterOptions, FrequencyField, FrequencyMap};
pub use dashboard::Dashboard;
