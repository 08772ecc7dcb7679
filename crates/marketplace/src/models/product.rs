//! Unified product view consumed by marketplace providers.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::MarketplaceError;

/// Provider-agnostic product content.
///
/// This is a read-only view of a product owned by the product store;
/// providers transform it into their own wire payloads and never persist
/// it themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: i64,
    /// Image URLs, most prominent first.
    pub images: Vec<String>,
    pub sku: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form provider hints (e.g. taxonomy id, item specifics).
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl ProductDetails {
    /// Validates the product for publishing.
    ///
    /// Providers call this before building any request, so a bad product
    /// never reaches the network.
    pub fn validate(&self) -> Result<(), MarketplaceError> {
        if self.title.trim().is_empty() {
            return Err(MarketplaceError::validation("title is required"));
        }
        if self.description.trim().is_empty() {
            return Err(MarketplaceError::validation("description is required"));
        }
        if self.price <= Decimal::ZERO {
            return Err(MarketplaceError::validation(
                "price must be greater than zero",
            ));
        }
        if self.quantity < 0 {
            return Err(MarketplaceError::validation("quantity cannot be negative"));
        }
        if self.images.is_empty() {
            return Err(MarketplaceError::validation(
                "at least one image is required",
            ));
        }
        Ok(())
    }

    /// Returns the attribute value for `key` as a string, if present.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }
}
