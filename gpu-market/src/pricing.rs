use crate::providers::ProviderId;
use crate::types::{PriceQuote, PriceRecord, PriceSource, PriceTable, GPU_MODELS};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Fallback prices in USD per hour.
///
/// Most provider pricing pages are rendered client-side, so these constants
/// stand in for a live pricing API. A row of `None` means the provider does
/// not publish comparable pricing.
pub struct StaticPriceSource;

impl StaticPriceSource {
    fn lookup(provider: ProviderId) -> ([Option<f64>; 3], &'static str) {
        match provider {
            ProviderId::Aws => ([Some(98.32), Some(32.77), Some(3.06)], "Global"),
            ProviderId::Azure => ([Some(6.98), Some(3.67), Some(3.06)], "Global"),
            ProviderId::Gcp => ([Some(11.05), Some(6.24), Some(2.48)], "Global"),
            ProviderId::CoreWeave => ([Some(4.25), Some(2.25), None], "US/Global"),
            ProviderId::LambdaLabs => ([Some(2.49), Some(1.29), Some(0.55)], "US"),
            ProviderId::NorthernData => ([None, None, None], "Europe"),
            ProviderId::OvhCloud => ([Some(3.39), Some(3.35), Some(2.19)], "Europe"),
            ProviderId::Hyperstack => ([Some(1.90), Some(1.35), None], "Global"),
        }
    }
}

impl PriceSource for StaticPriceSource {
    fn source_name(&self) -> &str {
        "static"
    }

    fn quote(&self, provider_key: &str) -> PriceQuote {
        match ProviderId::from_key(provider_key) {
            Some(provider) => {
                let (prices, region) = Self::lookup(provider);
                PriceQuote {
                    prices: GPU_MODELS
                        .iter()
                        .zip(prices)
                        .map(|(model, price)| (model.to_string(), price))
                        .collect::<BTreeMap<_, _>>(),
                    region: region.to_string(),
                }
            }
            None => PriceQuote::unpublished(&GPU_MODELS, ""),
        }
    }
}

/// Builds one row per provider, in the order given.
pub fn build_price_table(source: &dyn PriceSource, providers: &[ProviderId]) -> PriceTable {
    debug!("Building price table for {} providers from {} source", providers.len(), source.source_name());

    let rows = providers
        .iter()
        .map(|provider| {
            let quote = source.quote(provider.key());
            PriceRecord {
                provider: provider.display_name().to_string(),
                prices: GPU_MODELS.iter().map(|model| quote.price_for(model)).collect(),
                region: quote.region,
                focus: provider.focus().to_string(),
            }
        })
        .collect::<Vec<_>>();

    info!("Built price table with {} rows", rows.len());

    PriceTable {
        models: GPU_MODELS.iter().map(|m| m.to_string()).collect(),
        rows,
    }
}

impl PriceTable {
    /// Provider with the lowest published price for `model`.
    pub fn cheapest(&self, model: &str) -> Option<(&str, f64)> {
        let column = self.models.iter().position(|m| m == model)?;
        self.rows
            .iter()
            .filter_map(|row| row.prices.get(column).copied().flatten().map(|p| (row.provider.as_str(), p)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}
