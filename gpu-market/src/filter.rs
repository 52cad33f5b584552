use crate::types::ArticleRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Selection over the four filterable dimensions.
///
/// An empty set places no constraint on its dimension. Non-empty sets are
/// combined with AND; within a set, any member matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub providers: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub locations: BTreeSet<String>,
    #[serde(default)]
    pub actors: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers.extend(providers.into_iter().map(Into::into));
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations.extend(locations.into_iter().map(Into::into));
        self
    }

    pub fn with_actors<I, S>(mut self, actors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actors.extend(actors.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty() && self.tags.is_empty() && self.locations.is_empty() && self.actors.is_empty()
    }

    pub fn matches(&self, article: &ArticleRecord) -> bool {
        let provider_ok = self.providers.is_empty() || self.providers.contains(&article.provider);
        let tags_ok = self.tags.is_empty() || !self.tags.is_disjoint(&article.tags);
        let location_ok = self.locations.is_empty()
            || article
                .location
                .as_ref()
                .is_some_and(|loc| self.locations.contains(loc));
        let actors_ok = self.actors.is_empty() || !self.actors.is_disjoint(&article.actors);

        provider_ok && tags_ok && location_ok && actors_ok
    }
}

/// Articles satisfying `criteria`, in their original relative order.
pub fn filter_articles(articles: &[ArticleRecord], criteria: &FilterCriteria) -> Vec<ArticleRecord> {
    let filtered: Vec<ArticleRecord> = articles
        .iter()
        .filter(|article| criteria.matches(article))
        .cloned()
        .collect();

    debug!("Filter kept {} of {} articles", filtered.len(), articles.len());
    filtered
}

/// Dimension counted by `compute_frequency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyField {
    Tags,
    Actors,
    Location,
}

impl FrequencyField {
    pub const ALL: [FrequencyField; 3] = [FrequencyField::Tags, FrequencyField::Location, FrequencyField::Actors];

    pub fn label(&self) -> &'static str {
        match self {
            FrequencyField::Tags => "Tag frequency",
            FrequencyField::Actors => "Actor distribution",
            FrequencyField::Location => "Location distribution",
        }
    }
}

impl fmt::Display for FrequencyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrequencyField::Tags => "tags",
            FrequencyField::Actors => "actors",
            FrequencyField::Location => "location",
        };
        f.write_str(name)
    }
}

impl FromStr for FrequencyField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tags" | "tag" => Ok(FrequencyField::Tags),
            "actors" | "actor" => Ok(FrequencyField::Actors),
            "location" | "locations" => Ok(FrequencyField::Location),
            other => Err(format!("Unknown frequency field: {}", other)),
        }
    }
}

pub type FrequencyMap = BTreeMap<String, usize>;

/// Counts each distinct value of `field` across `articles`.
///
/// Every element of a list field contributes one count; a location
/// contributes one count per article. Empty values are never counted.
pub fn compute_frequency(articles: &[ArticleRecord], field: FrequencyField) -> FrequencyMap {
    let mut counts = FrequencyMap::new();

    for article in articles {
        let values: Vec<&String> = match field {
            FrequencyField::Tags => article.tags.iter().collect(),
            FrequencyField::Actors => article.actors.iter().collect(),
            FrequencyField::Location => article.location.iter().collect(),
        };

        for value in values.into_iter().filter(|v| !v.trim().is_empty()) {
            *counts.entry(value.clone()).or_insert(0) += 1;
        }
    }

    counts
}

/// Values offered for each filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// First-seen order.
    pub providers: Vec<String>,
    pub tags: Vec<String>,
    pub locations: Vec<String>,
    pub actors: Vec<String>,
}

impl FilterOptions {
    pub fn from_articles(articles: &[ArticleRecord]) -> Self {
        let mut providers: Vec<String> = Vec::new();
        for article in articles {
            if !providers.contains(&article.provider) {
                providers.push(article.provider.clone());
            }
        }

        let sorted_keys = |field: FrequencyField| compute_frequency(articles, field).into_keys().collect::<Vec<_>>();

        Self {
            providers,
            tags: sorted_keys(FrequencyField::Tags),
            locations: sorted_keys(FrequencyField::Location),
            actors: sorted_keys(FrequencyField::Actors),
        }
    }
}
