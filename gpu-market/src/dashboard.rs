use crate::enrichment::Enricher;
use crate::filter::{compute_frequency, filter_articles, FilterCriteria, FrequencyField};
use crate::news::{with_keyword_tags, NewsService};
use crate::presentation::{overview_page, structured_news_page, OverviewPage, StructuredNewsPage};
use crate::pricing::build_price_table;
use crate::providers::ProviderId;
use crate::traits::FeedSource;
use crate::types::{ArticleRecord, MarketError, PriceSource, PriceTable, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Runs one full pipeline pass per page render. Nothing carries over
/// between renders.
pub struct Dashboard {
    prices: Arc<dyn PriceSource>,
    news: NewsService,
    enricher: Option<Enricher>,
}

impl Dashboard {
    pub fn new(prices: Arc<dyn PriceSource>, feeds: Arc<dyn FeedSource>) -> Self {
        Self {
            prices,
            news: NewsService::new(feeds),
            enricher: None,
        }
    }

    pub fn with_enricher(mut self, enricher: Enricher) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn price_table(&self) -> PriceTable {
        build_price_table(self.prices.as_ref(), &ProviderId::ALL)
    }

    /// Price table plus the latest keyword-tagged news of every provider.
    pub async fn overview(&self, limit: usize) -> OverviewPage {
        let start = Instant::now();

        let table = self.price_table();
        let news: Vec<(ProviderId, Vec<ArticleRecord>)> = self
            .news
            .fetch_all_news(limit)
            .await
            .into_iter()
            .map(|(provider, articles)| (provider, articles.into_iter().map(with_keyword_tags).collect()))
            .collect();

        info!("Overview rendered in {:.2}s", start.elapsed().as_secs_f32());
        overview_page(&table, &news)
    }

    /// All provider articles, keyword-tagged and then enriched.
    pub async fn structured_articles(&self, limit: usize) -> Result<Vec<ArticleRecord>> {
        let enricher = self
            .enricher
            .as_ref()
            .ok_or_else(|| MarketError::Config("Structured news requires an extraction backend".to_string()))?;

        let articles: Vec<ArticleRecord> = self
            .news
            .fetch_all_news(limit)
            .await
            .into_iter()
            .flat_map(|(_, articles)| articles)
            .map(with_keyword_tags)
            .collect();

        Ok(enricher.enrich_all(&articles).await)
    }

    /// Enriched articles narrowed by `criteria`, with frequency charts over
    /// the filtered set.
    pub async fn structured_news(&self, limit: usize, criteria: &FilterCriteria) -> Result<StructuredNewsPage> {
        let start = Instant::now();

        let articles = self.structured_articles(limit).await?;
        let page = build_structured_page(&articles, criteria);

        info!(
            "Structured news rendered in {:.2}s ({} of {} articles shown)",
            start.elapsed().as_secs_f32(),
            page.rows.len(),
            page.total_articles
        );
        Ok(page)
    }
}

/// Filters `articles` and aggregates the survivors into a page.
pub fn build_structured_page(articles: &[ArticleRecord], criteria: &FilterCriteria) -> StructuredNewsPage {
    let filtered = filter_articles(articles, criteria);
    let frequencies: Vec<_> = FrequencyField::ALL
        .iter()
        .map(|field| (*field, compute_frequency(&filtered, *field)))
        .collect();

    structured_news_page(articles, criteria, &filtered, &frequencies)
}
