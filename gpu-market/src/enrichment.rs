use crate::llm_adapter::{ExtractionConfig, OpenAiExtractor};
use crate::traits::Extractor;
use crate::types::{ArticleRecord, MarketError, Result, StructuredFields};
use futures::stream::{self, StreamExt};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Upper bound on extraction calls in flight at once.
    pub max_in_flight: usize,
    /// Per-call limit; a call that runs over counts as a malformed response.
    pub call_timeout_seconds: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 4,
            call_timeout_seconds: 60,
        }
    }
}

impl EnrichmentConfig {
    /// `extraction` with its HTTP timeout matched to the per-call limit, so
    /// the client never cuts a call short of it.
    pub fn client_settings(&self, extraction: ExtractionConfig) -> ExtractionConfig {
        extraction.with_timeout(self.call_timeout_seconds)
    }
}

/// Adds extracted summary, location, tags and actors to articles.
///
/// A bad or missing answer for one article never fails the batch: that
/// article gets `StructuredFields::empty()` instead.
pub struct Enricher {
    extractor: Arc<dyn Extractor>,
    config: EnrichmentConfig,
}

impl Enricher {
    pub fn new(extractor: Arc<dyn Extractor>, config: EnrichmentConfig) -> Self {
        Self { extractor, config }
    }

    /// Enricher backed by the chat completions endpoint described by `extraction`.
    pub fn with_openai(extraction: ExtractionConfig, config: EnrichmentConfig) -> Result<Self> {
        let extraction = config.client_settings(extraction);
        info!("Extraction configured: {:?}", extraction);
        let extractor = OpenAiExtractor::new(extraction)?;
        Ok(Self::new(Arc::new(extractor), config))
    }

    /// Reads the extraction settings from the environment. Fails when the
    /// API key is missing, before any article is touched.
    pub fn from_env(config: EnrichmentConfig) -> Result<Self> {
        let extraction = ExtractionConfig::from_env()?;
        Self::with_openai(extraction, config)
    }

    pub fn extractor_name(&self) -> String {
        self.extractor.extractor_name()
    }

    pub async fn enrich(&self, article: &ArticleRecord) -> StructuredFields {
        let text = article.extraction_text();
        let limit = Duration::from_secs(self.config.call_timeout_seconds);

        let outcome = match tokio::time::timeout(limit, self.extractor.extract(&text)).await {
            Ok(Ok(raw)) => parse_structured_fields(&raw),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(MarketError::Timeout {
                seconds: self.config.call_timeout_seconds,
            }),
        };

        outcome.unwrap_or_else(|e| {
            warn!("Extraction failed for '{}', using empty fields: {}", article.title, e);
            StructuredFields::empty()
        })
    }

    /// Enriches every article, keeping input order.
    pub async fn enrich_all(&self, articles: &[ArticleRecord]) -> Vec<ArticleRecord> {
        let in_flight = self.config.max_in_flight.max(1);
        info!(
            "Enriching {} articles via {} ({} in flight)",
            articles.len(),
            self.extractor.extractor_name(),
            in_flight
        );

        stream::iter(articles)
            .map(|article| async move {
                let fields = self.enrich(article).await;
                article.with_enrichment(&fields)
            })
            .buffered(in_flight)
            .collect::<Vec<_>>()
            .await
    }
}

/// Decodes an extraction response.
///
/// The response must be a JSON object carrying all four keys, optionally
/// wrapped in a Markdown code fence.
pub fn parse_structured_fields(raw: &str) -> Result<StructuredFields> {
    let body = strip_code_fence(raw);
    let value: Value = serde_json::from_str(body)?;

    let Value::Object(object) = value else {
        return Err(MarketError::Extraction("Response is not a JSON object".to_string()));
    };

    let fields = StructuredFields {
        summary: scalar_field(&object, "summary")?,
        location: location_field(&object)?,
        tags: list_field(&object, "tags")?,
        actors: list_field(&object, "actors")?,
    };

    debug!("Decoded structured fields: {} tags, {} actors", fields.tags.len(), fields.actors.len());
    Ok(fields)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn required<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    object
        .get(key)
        .ok_or_else(|| MarketError::Extraction(format!("Missing key '{}'", key)))
}

fn scalar_field(object: &Map<String, Value>, key: &str) -> Result<String> {
    match required(object, key)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Null => Ok(String::new()),
        other => Err(MarketError::Extraction(format!("Key '{}' has unexpected value {}", key, other))),
    }
}

fn location_field(object: &Map<String, Value>) -> Result<String> {
    match required(object, "location")? {
        Value::Array(items) => Ok(items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or("")
            .to_string()),
        _ => scalar_field(object, "location"),
    }
}

fn list_field(object: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    let items = match required(object, key)? {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').map(|part| part.trim().to_string()).collect(),
        Value::Null => Vec::new(),
        other => {
            return Err(MarketError::Extraction(format!("Key '{}' has unexpected value {}", key, other)));
        }
    };

    Ok(items.into_iter().filter(|s: &String| !s.is_empty()).collect())
}
