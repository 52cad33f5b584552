use crate::providers::ProviderId;
use crate::traits::FeedSource;
use crate::types::{ArticleRecord, RawFeedEntry};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Vocabulary for keyword tagging. Matched as lowercase substrings.
pub const KEYWORD_VOCABULARY: [&str; 8] = ["gpu", "ai", "ml", "cloud", "price", "launch", "update", "partnership"];

/// Turns the first `limit` raw feed entries into article records, in feed
/// order. Entries without a link are dropped after truncation, so they never
/// pull in entries past the limit.
pub fn normalize_feed(provider: ProviderId, raw_entries: &[RawFeedEntry], limit: usize) -> Vec<ArticleRecord> {
    raw_entries
        .iter()
        .take(limit)
        .filter(|entry| !entry.link.trim().is_empty())
        .map(|entry| {
            let title = entry.title.trim();
            ArticleRecord {
                title: if title.is_empty() { "Untitled".to_string() } else { title.to_string() },
                link: entry.link.trim().to_string(),
                published: entry.published.clone().unwrap_or_default(),
                summary: entry.summary.clone().unwrap_or_default(),
                provider: provider.display_name().to_string(),
                tags: BTreeSet::new(),
                location: None,
                actors: BTreeSet::new(),
            }
        })
        .collect()
}

/// Vocabulary words found in the article's title and summary.
pub fn derive_keyword_tags(article: &ArticleRecord) -> BTreeSet<String> {
    let text = format!("{} {}", article.title, article.summary).to_lowercase();

    KEYWORD_VOCABULARY
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Returns the article with its keyword tags filled in.
pub fn with_keyword_tags(mut article: ArticleRecord) -> ArticleRecord {
    article.tags = derive_keyword_tags(&article);
    article
}

/// Reads provider news through a feed source. Nothing is cached; each call
/// fetches again.
#[derive(Clone)]
pub struct NewsService {
    feeds: Arc<dyn FeedSource>,
}

impl NewsService {
    pub fn new(feeds: Arc<dyn FeedSource>) -> Self {
        Self { feeds }
    }

    /// News for a provider given by key or display name.
    ///
    /// Unknown providers, providers without a feed and unreachable feeds all
    /// produce an empty list.
    pub async fn fetch_news(&self, provider_key: &str, limit: usize) -> Vec<ArticleRecord> {
        let Some(provider) = ProviderId::from_key(provider_key) else {
            debug!("Unknown provider '{}', no news", provider_key);
            return Vec::new();
        };

        self.fetch_provider_news(provider, limit).await
    }

    pub async fn fetch_provider_news(&self, provider: ProviderId, limit: usize) -> Vec<ArticleRecord> {
        let Some(url) = provider.feed_url() else {
            debug!("{} publishes no feed", provider);
            return Vec::new();
        };

        let raw_entries = self.feeds.fetch_feed(url).await;
        let articles = normalize_feed(provider, &raw_entries, limit);

        debug!("{}: {} of {} entries kept", provider, articles.len(), raw_entries.len());
        articles
    }

    /// News for every provider with a feed, in provider order.
    pub async fn fetch_all_news(&self, limit: usize) -> Vec<(ProviderId, Vec<ArticleRecord>)> {
        let mut all = Vec::new();

        for provider in ProviderId::with_feeds() {
            let articles = self.fetch_provider_news(provider, limit).await;
            all.push((provider, articles));
        }

        let total: usize = all.iter().map(|(_, articles)| articles.len()).sum();
        info!("Fetched {} articles from {} providers via {}", total, all.len(), self.feeds.source_name());

        all
    }
}
