//! Read-only product view.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sellbridge_marketplace::ProductDetails;

/// A product as read from the product store.
///
/// The cross-listing core only ever reads products; all mutation happens
/// in the owning application. `user_id` is carried for ownership checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: i64,
    pub images: Vec<String>,
    pub sku: String,
    pub brand: Option<String>,
    pub condition: Option<String>,
    pub tags: Vec<String>,
    pub attributes: HashMap<String, serde_json::Value>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// The provider-facing slice of this product.
    pub fn details(&self) -> ProductDetails {
        ProductDetails {
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            quantity: self.quantity,
            images: self.images.clone(),
            sku: self.sku.clone(),
            brand: self.brand.clone(),
            condition: self.condition.clone(),
            tags: self.tags.clone(),
            attributes: self.attributes.clone(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
