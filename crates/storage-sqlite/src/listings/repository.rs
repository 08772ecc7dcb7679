//! Diesel-backed listing repository.

use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::DieselErrorExt;
use crate::schema::listings;
use crate::schema::listings::dsl::*;

use super::model::ListingDB;
use sellbridge_core::errors::Result;
use sellbridge_core::listings::{Listing, ListingRepositoryTrait, ListingStatus, ListingUpsert};
use sellbridge_marketplace::Marketplace;

/// Repository for managing listing rows in the database.
pub struct ListingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ListingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ListingRepositoryTrait for ListingRepository {
    fn find_for_publish(&self, product: &str, market: Marketplace) -> Result<Option<Listing>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<ListingDB> = listings
            .select(ListingDB::as_select())
            .filter(product_id.eq(product))
            .filter(marketplace.eq(market.as_str()))
            .filter(status.eq_any([
                ListingStatus::Active.as_str(),
                ListingStatus::Expired.as_str(),
            ]))
            .order(updated_at.desc())
            .load(&mut conn)
            .map_err(|e| e.into_core_error())?;

        // Prefer the ACTIVE row; otherwise the most recent EXPIRED one.
        let chosen = rows
            .iter()
            .find(|r| r.status == ListingStatus::Active.as_str())
            .or_else(|| rows.first())
            .cloned();
        chosen.map(Listing::try_from).transpose()
    }

    async fn upsert(&self, upsert: ListingUpsert) -> Result<Listing> {
        self.writer
            .exec(move |conn| {
                let existing: Option<ListingDB> = listings
                    .select(ListingDB::as_select())
                    .filter(product_id.eq(&upsert.product_id))
                    .filter(marketplace.eq(upsert.marketplace.as_str()))
                    .order(updated_at.desc())
                    .first(conn)
                    .optional()
                    .map_err(|e| e.into_core_error())?;

                let row = match existing {
                    // Keyed on (product, marketplace): a relist transitions
                    // the existing row instead of duplicating it.
                    Some(mut row) => {
                        row.marketplace_listing_id = upsert.marketplace_listing_id;
                        row.status = upsert.status.as_str().to_string();
                        row.price = upsert.price.to_string();
                        row.quantity = upsert.quantity;
                        row.url = upsert.url;
                        row.is_smart_relist = upsert.smart_relist;
                        row.updated_at = chrono::Utc::now().naive_utc();

                        diesel::update(listings.find(&row.id))
                            .set(&row)
                            .execute(conn)
                            .map_err(|e| e.into_core_error())?;
                        row
                    }
                    None => {
                        let row: ListingDB = upsert.into();
                        diesel::insert_into(listings::table)
                            .values(&row)
                            .execute(conn)
                            .map_err(|e| e.into_core_error())?;
                        row
                    }
                };

                Listing::try_from(row)
            })
            .await
    }

    fn list_active_for_product(&self, product: &str) -> Result<Vec<Listing>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<ListingDB> = listings
            .select(ListingDB::as_select())
            .filter(product_id.eq(product))
            .filter(status.eq(ListingStatus::Active.as_str()))
            .load(&mut conn)
            .map_err(|e| e.into_core_error())?;

        rows.into_iter().map(Listing::try_from).collect()
    }

    fn list_for_user(&self, user: &str) -> Result<Vec<Listing>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<ListingDB> = listings
            .select(ListingDB::as_select())
            .filter(user_id.eq(user))
            .order(updated_at.desc())
            .load(&mut conn)
            .map_err(|e| e.into_core_error())?;

        rows.into_iter().map(Listing::try_from).collect()
    }

    async fn update_quantity(&self, listing: &str, new_quantity: i64) -> Result<()> {
        let row_id = listing.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(listings.find(row_id))
                    .set((
                        quantity.eq(new_quantity),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(|e| e.into_core_error())?;
                Ok(())
            })
            .await
    }

    async fn update_status(&self, listing: &str, new_status: ListingStatus) -> Result<()> {
        let row_id = listing.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(listings.find(row_id))
                    .set((
                        status.eq(new_status.as_str()),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(|e| e.into_core_error())?;
                Ok(())
            })
            .await
    }
}
