//! Per-marketplace outcome of a cross-listing call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::listings::Listing;

/// What happened on one marketplace during a cross-list.
///
/// The orchestrator returns exactly one of these per requested
/// marketplace, success or not; callers never have to infer a missing
/// entry's fate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<Listing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_saved: Option<Decimal>,
}

impl MarketplaceOutcome {
    pub fn succeeded(listing: Listing, cost_saved: Option<Decimal>) -> Self {
        Self {
            success: true,
            listing: Some(listing),
            error: None,
            cost_saved,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            listing: None,
            error: Some(error.into()),
            cost_saved: None,
        }
    }
}
