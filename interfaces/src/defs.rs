use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry as delivered by a feed source, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFeedEntry {
    pub title: String,
    pub link: String,
    pub published: Option<String>,
    pub summary: Option<String>,
}

/// Fields derived from article text by the extraction collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFields {
    pub summary: String,
    pub location: String,
    pub tags: Vec<String>,
    pub actors: Vec<String>,
}

/// Hourly prices for one provider, keyed by GPU model.
/// `None` means the provider publishes no comparable price for that model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub prices: BTreeMap<String, Option<f64>>,
    pub region: String,
}

impl PriceQuote {
    pub fn price_for(&self, model: &str) -> Option<f64> {
        self.prices.get(model).copied().flatten()
    }
}

// Object style note:
// Price sources are plain lookups. An implementation may be backed by
// constants or by a live pricing API, but it must answer for every provider
// key it is asked about, so callers never have to handle a missing row.

pub trait PriceSource: Send + Sync {
    /// Name used in logs.
    fn source_name(&self) -> &str;

    /// Quote for the provider identified by `provider_key`.
    fn quote(&self, provider_key: &str) -> PriceQuote;
}
