use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::MarketError;

/// GPU cloud vendors tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Aws,
    Azure,
    Gcp,
    CoreWeave,
    LambdaLabs,
    NorthernData,
    OvhCloud,
    Hyperstack,
}

impl ProviderId {
    /// Every known provider, in table order.
    pub const ALL: [ProviderId; 8] = [
        ProviderId::Aws,
        ProviderId::Azure,
        ProviderId::Gcp,
        ProviderId::CoreWeave,
        ProviderId::LambdaLabs,
        ProviderId::NorthernData,
        ProviderId::OvhCloud,
        ProviderId::Hyperstack,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ProviderId::Aws => "aws",
            ProviderId::Azure => "azure",
            ProviderId::Gcp => "gcp",
            ProviderId::CoreWeave => "coreweave",
            ProviderId::LambdaLabs => "lambdalabs",
            ProviderId::NorthernData => "northerndata",
            ProviderId::OvhCloud => "ovhcloud",
            ProviderId::Hyperstack => "hyperstack",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Aws => "AWS",
            ProviderId::Azure => "Microsoft Azure",
            ProviderId::Gcp => "Google Cloud",
            ProviderId::CoreWeave => "CoreWeave",
            ProviderId::LambdaLabs => "Lambda Labs",
            ProviderId::NorthernData => "Northern Data (Taiga)",
            ProviderId::OvhCloud => "OVHcloud",
            ProviderId::Hyperstack => "Hyperstack",
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            ProviderId::Aws | ProviderId::Azure | ProviderId::Gcp => "Hyperscaler",
            ProviderId::CoreWeave => "GPU Specialized",
            ProviderId::LambdaLabs => "AI/ML Specialized",
            ProviderId::NorthernData => "European AI Cloud",
            ProviderId::OvhCloud => "European Cloud",
            ProviderId::Hyperstack => "Multi-Cloud",
        }
    }

    /// News feed of the provider, if it publishes one.
    pub fn feed_url(&self) -> Option<&'static str> {
        match self {
            ProviderId::Aws => Some("https://aws.amazon.com/blogs/aws/feed/"),
            ProviderId::Azure => Some("https://azure.microsoft.com/en-us/updates/feed/"),
            ProviderId::Gcp => Some("https://cloud.google.com/blog/rss/"),
            ProviderId::CoreWeave => Some("https://coreweave.com/blog/rss.xml"),
            ProviderId::LambdaLabs => Some("https://lambdalabs.com/blog/rss"),
            ProviderId::OvhCloud => Some("https://www.ovhcloud.com/en/news/feed/"),
            ProviderId::NorthernData | ProviderId::Hyperstack => None,
        }
    }

    /// Providers that publish a news feed, in table order.
    pub fn with_feeds() -> impl Iterator<Item = ProviderId> {
        Self::ALL.into_iter().filter(|p| p.feed_url().is_some())
    }

    /// Looks up a provider by key or display name, ignoring case.
    pub fn from_key(key: &str) -> Option<ProviderId> {
        let needle = key.trim();
        Self::ALL.into_iter().find(|p| {
            p.key().eq_ignore_ascii_case(needle) || p.display_name().eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderId {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::from_key(s).ok_or_else(|| MarketError::General(format!("Unknown provider: {}", s)))
    }
}
