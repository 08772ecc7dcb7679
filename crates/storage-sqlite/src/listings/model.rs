//! Database model for listings.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::errors::StorageError;
use sellbridge_core::errors::Error;
use sellbridge_core::listings::{Listing, ListingStatus, ListingUpsert};
use sellbridge_marketplace::Marketplace;

/// Database model for listings
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::listings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ListingDB {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub marketplace: String,
    pub marketplace_listing_id: String,
    pub status: String,
    /// Decimal persisted as text to avoid float drift.
    pub price: String,
    pub quantity: i64,
    pub url: Option<String>,
    pub is_smart_relist: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ListingDB> for Listing {
    type Error = Error;

    fn try_from(db: ListingDB) -> Result<Self, Error> {
        let marketplace = Marketplace::from_str(&db.marketplace).map_err(|_| {
            StorageError::CorruptRow(format!(
                "listing {} has unknown marketplace '{}'",
                db.id, db.marketplace
            ))
        })?;
        let status = ListingStatus::parse(&db.status).ok_or_else(|| {
            StorageError::CorruptRow(format!(
                "listing {} has unknown status '{}'",
                db.id, db.status
            ))
        })?;
        let price = Decimal::from_str(&db.price).map_err(|e| {
            StorageError::CorruptRow(format!("listing {} has bad price: {}", db.id, e))
        })?;
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            product_id: db.product_id,
            marketplace,
            marketplace_listing_id: db.marketplace_listing_id,
            status,
            price,
            quantity: db.quantity,
            url: db.url,
            smart_relist: db.is_smart_relist,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<ListingUpsert> for ListingDB {
    fn from(domain: ListingUpsert) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: domain.user_id,
            product_id: domain.product_id,
            marketplace: domain.marketplace.as_str().to_string(),
            marketplace_listing_id: domain.marketplace_listing_id,
            status: domain.status.as_str().to_string(),
            price: domain.price.to_string(),
            quantity: domain.quantity,
            url: domain.url,
            is_smart_relist: domain.smart_relist,
            created_at: now,
            updated_at: now,
        }
    }
}
