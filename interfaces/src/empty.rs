use std::collections::BTreeMap;

use crate::defs::PriceQuote;
use crate::defs::PriceSource;
use crate::defs::StructuredFields;

impl StructuredFields {
    /// The well-defined result used whenever extraction output is unusable.
    pub fn empty() -> Self {
        StructuredFields {
            summary: "".to_owned(),
            location: "".to_owned(),
            tags: vec![],
            actors: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.location.is_empty() && self.tags.is_empty() && self.actors.is_empty()
    }
}

impl PriceQuote {
    /// A quote with no published price for any of `models`.
    pub fn unpublished(models: &[&str], region: &str) -> Self {
        PriceQuote {
            prices: models.iter().map(|m| ((*m).to_owned(), None)).collect::<BTreeMap<_, _>>(),
            region: region.to_owned(),
        }
    }
}

/// Price source that knows nothing: every provider gets an empty quote.
pub struct EmptyPriceSource;

impl PriceSource for EmptyPriceSource {
    fn source_name(&self) -> &str {
        "empty"
    }

    fn quote(&self, _provider_key: &str) -> PriceQuote {
        // Nothing is published, the region is unknown.
        PriceQuote {
            prices: BTreeMap::new(),
            region: "".to_owned(),
        }
    }
}
