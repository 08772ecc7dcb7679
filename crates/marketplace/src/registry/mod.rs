//! Registry mapping marketplace identifiers to provider instances.
//!
//! The registry is the only place in the system that knows which concrete
//! provider backs which marketplace; everything downstream is polymorphic
//! over [`MarketplaceProvider`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::MarketplaceError;
use crate::provider::MarketplaceProvider;

/// Supported marketplace identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Marketplace {
    Ebay,
    Etsy,
    Whatnot,
}

impl Marketplace {
    /// Stable string form used in storage and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Marketplace::Ebay => "EBAY",
            Marketplace::Etsy => "ETSY",
            Marketplace::Whatnot => "WHATNOT",
        }
    }

    /// All known marketplaces, in display order.
    pub fn all() -> &'static [Marketplace] {
        &[Marketplace::Ebay, Marketplace::Etsy, Marketplace::Whatnot]
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Marketplace {
    type Err = MarketplaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EBAY" => Ok(Marketplace::Ebay),
            "ETSY" => Ok(Marketplace::Etsy),
            "WHATNOT" => Ok(Marketplace::Whatnot),
            other => Err(MarketplaceError::Unsupported {
                operation: "resolve".to_string(),
                provider: other.to_string(),
            }),
        }
    }
}

/// Maps a [`Marketplace`] to its provider instance.
///
/// Built once at startup from the configured OAuth app credentials;
/// marketplaces without configuration simply don't register, and lookups
/// for them fail with [`MarketplaceError::Unsupported`].
#[derive(Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<Marketplace, Arc<dyn MarketplaceProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider for a marketplace, replacing any previous one.
    pub fn register(&mut self, marketplace: Marketplace, provider: Arc<dyn MarketplaceProvider>) {
        self.providers.insert(marketplace, provider);
    }

    /// Resolves the provider for a marketplace.
    pub fn get(
        &self,
        marketplace: Marketplace,
    ) -> Result<Arc<dyn MarketplaceProvider>, MarketplaceError> {
        self.providers
            .get(&marketplace)
            .cloned()
            .ok_or_else(|| MarketplaceError::Unsupported {
                operation: "resolve".to_string(),
                provider: marketplace.to_string(),
            })
    }

    /// Registered marketplaces, in stable order.
    pub fn supported(&self) -> Vec<Marketplace> {
        self.providers.keys().copied().collect()
    }

    /// Registered providers, in stable order.
    pub fn providers(&self) -> impl Iterator<Item = (Marketplace, &Arc<dyn MarketplaceProvider>)> {
        self.providers.iter().map(|(m, p)| (*m, p))
    }
}
