//! Listing read service.
//!
//! Local listing rows only learn about provider-side lifecycle changes
//! (sold out, expired) when somebody looks: reads pull the current state
//! from the provider and fold transitions back into the stored rows.

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, warn};

use super::{Listing, ListingRepositoryTrait, ListingStatus};
use crate::credentials::CredentialServiceTrait;
use crate::errors::Result;
use sellbridge_marketplace::registry::ProviderRegistry;

/// Read-side service over the listing table.
pub struct ListingService {
    listings: Arc<dyn ListingRepositoryTrait>,
    credentials: Arc<dyn CredentialServiceTrait>,
    registry: Arc<ProviderRegistry>,
}

impl ListingService {
    pub fn new(
        listings: Arc<dyn ListingRepositoryTrait>,
        credentials: Arc<dyn CredentialServiceTrait>,
        registry: Arc<ProviderRegistry>,
    ) -> Self {
        Self {
            listings,
            credentials,
            registry,
        }
    }

    /// All of a user's listings, with provider-reported lifecycle folded
    /// in.
    ///
    /// Refreshing is best-effort per listing: an unreachable provider
    /// leaves that row's stored status as the last known one.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Listing>> {
        let stored = self.listings.list_for_user(user_id)?;

        let tasks = stored
            .into_iter()
            .map(|listing| self.refresh_one(listing, user_id));
        Ok(join_all(tasks).await)
    }

    /// Pull the provider's view of one listing and record any transition.
    async fn refresh_one(&self, mut listing: Listing, user_id: &str) -> Listing {
        // Terminal rows don't come back; skip the provider round-trip.
        if matches!(listing.status, ListingStatus::Sold | ListingStatus::Ended) {
            return listing;
        }

        let credential = match self
            .credentials
            .get_credential(user_id, listing.marketplace)
            .await
        {
            Ok(Some(credential)) => credential,
            _ => return listing,
        };
        let Ok(provider) = self.registry.get(listing.marketplace) else {
            return listing;
        };

        match provider
            .get_listing(&listing.marketplace_listing_id, &credential)
            .await
        {
            Ok(Some(remote)) => {
                let reported: ListingStatus = remote.state.into();
                if reported != listing.status {
                    debug!(
                        "Listing {} moved {} -> {} on {}",
                        listing.id,
                        listing.status.as_str(),
                        reported.as_str(),
                        listing.marketplace
                    );
                    if let Err(e) = self.listings.update_status(&listing.id, reported).await {
                        warn!("Failed to record status for listing {}: {}", listing.id, e);
                        return listing;
                    }
                    listing.status = reported;
                }
                if let Some(quantity) = remote.quantity {
                    listing.quantity = quantity;
                }
                listing
            }
            // Gone on the provider side; locally that's an ended slot.
            Ok(None) => {
                if self
                    .listings
                    .update_status(&listing.id, ListingStatus::Ended)
                    .await
                    .is_ok()
                {
                    listing.status = ListingStatus::Ended;
                }
                listing
            }
            Err(e) => {
                warn!(
                    "Could not refresh listing {} from {}: {}",
                    listing.id, listing.marketplace, e
                );
                listing
            }
        }
    }
}
