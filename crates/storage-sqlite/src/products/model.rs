//! Database model for the product view.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::errors::StorageError;
use sellbridge_core::errors::Error;
use sellbridge_core::products::Product;

/// Database model for products.
///
/// List/map fields are stored as JSON text; the cross-listing core never
/// writes this table.
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub quantity: i64,
    pub images: String,
    pub sku: String,
    pub brand: Option<String>,
    pub condition: Option<String>,
    pub tags: String,
    pub attributes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ProductDB> for Product {
    type Error = Error;

    fn try_from(db: ProductDB) -> Result<Self, Error> {
        let corrupt =
            |what: &str, detail: String| StorageError::CorruptRow(format!("product {} has bad {}: {}", db.id, what, detail));

        let price = Decimal::from_str(&db.price).map_err(|e| corrupt("price", e.to_string()))?;
        let images: Vec<String> =
            serde_json::from_str(&db.images).map_err(|e| corrupt("images", e.to_string()))?;
        let tags: Vec<String> =
            serde_json::from_str(&db.tags).map_err(|e| corrupt("tags", e.to_string()))?;
        let attributes: HashMap<String, serde_json::Value> =
            serde_json::from_str(&db.attributes).map_err(|e| corrupt("attributes", e.to_string()))?;

        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            description: db.description,
            price,
            quantity: db.quantity,
            images,
            sku: db.sku,
            brand: db.brand,
            condition: db.condition,
            tags,
            attributes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
