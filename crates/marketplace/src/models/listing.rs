//! Normalized listing models returned by providers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalized outcome of a create/update/relist call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult {
    /// Provider-side listing identifier.
    pub listing_id: String,
    /// Public listing URL, when the provider reports one.
    #[serde(default)]
    pub url: Option<String>,
    pub state: RemoteListingState,
    /// Fee avoided by reusing an inactive listing slot instead of
    /// creating a new paid listing.
    #[serde(default)]
    pub cost_saved: Option<Decimal>,
    /// True when the result came from the smart-relist path.
    #[serde(default)]
    pub smart_relist: bool,
}

/// Lifecycle state of a listing as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteListingState {
    Active,
    Inactive,
    SoldOut,
    Expired,
    Ended,
    Draft,
    Unknown,
}

impl RemoteListingState {
    /// States eligible for smart relist: the slot exists but is not live.
    pub fn is_reusable(&self) -> bool {
        matches!(self, Self::Inactive | Self::SoldOut | Self::Expired)
    }
}

/// A listing snapshot read back from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteListing {
    pub listing_id: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<i64>,
    pub state: RemoteListingState,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
}

/// A node in the provider's category taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Human-readable path from the taxonomy root, e.g.
    /// "Electronics > Cameras > Film Cameras".
    #[serde(default)]
    pub path: Option<String>,
}

/// Best-effort listing metrics. All fields optional; a provider that
/// cannot answer returns the default (empty) value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingAnalytics {
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub watchers: Option<u64>,
    #[serde(default)]
    pub favorites: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reusable_states() {
        assert!(RemoteListingState::Inactive.is_reusable());
        assert!(RemoteListingState::SoldOut.is_reusable());
        assert!(RemoteListingState::Expired.is_reusable());
        assert!(!RemoteListingState::Active.is_reusable());
        assert!(!RemoteListingState::Ended.is_reusable());
        assert!(!RemoteListingState::Draft.is_reusable());
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&RemoteListingState::SoldOut).unwrap();
        assert_eq!(json, "\"sold_out\"");
    }
}
