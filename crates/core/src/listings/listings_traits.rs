//! Listing repository trait.

use async_trait::async_trait;

use super::{Listing, ListingStatus, ListingUpsert};
use crate::errors::Result;
use sellbridge_marketplace::Marketplace;

/// Trait defining the contract for listing repository operations.
#[async_trait]
pub trait ListingRepositoryTrait: Send + Sync {
    /// The row a publish should reuse for this (product, marketplace):
    /// the ACTIVE one, or failing that the most recent EXPIRED one.
    fn find_for_publish(
        &self,
        product_id: &str,
        marketplace: Marketplace,
    ) -> Result<Option<Listing>>;

    /// Creates or updates the row for the upsert's (product, marketplace)
    /// pair. Keyed on the pair rather than the marketplace listing id so
    /// a relist transitions the existing row and the one-ACTIVE-row
    /// invariant holds.
    async fn upsert(&self, listing: ListingUpsert) -> Result<Listing>;

    /// All ACTIVE listings of a product, across marketplaces.
    fn list_active_for_product(&self, product_id: &str) -> Result<Vec<Listing>>;

    /// All listings belonging to a user.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Listing>>;

    /// Overwrites the locally tracked quantity after an inventory sync.
    async fn update_quantity(&self, listing_id: &str, quantity: i64) -> Result<()>;

    /// Records a provider-reported lifecycle transition.
    async fn update_status(&self, listing_id: &str, status: ListingStatus) -> Result<()>;
}
