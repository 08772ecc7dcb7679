//! Inventory sync coordinator.
//!
//! Propagates a quantity change to every active listing of a product,
//! one independent task per marketplace. This is deliberately a
//! best-effort fan-out: there is no aggregate verdict, each marketplace
//! reports its own outcome through events, and a failed marketplace
//! keeps its last-known-good stored quantity rather than pretending the
//! provider accepted the change.

use std::sync::Arc;

use futures::future::join_all;
use log::{info, warn};

use crate::credentials::CredentialServiceTrait;
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink, SyncOutcome};
use crate::listings::{Listing, ListingRepositoryTrait};
use crate::sync_log::{NewSyncLogEntry, SyncAction, SyncLogRepositoryTrait, SyncStatus};
use sellbridge_marketplace::registry::ProviderRegistry;
use sellbridge_marketplace::Marketplace;

const OPERATION: &str = "inventory_sync";

/// Pushes quantity changes out to every marketplace a product lives on.
pub struct InventorySyncService {
    credentials: Arc<dyn CredentialServiceTrait>,
    listings: Arc<dyn ListingRepositoryTrait>,
    sync_log: Arc<dyn SyncLogRepositoryTrait>,
    registry: Arc<ProviderRegistry>,
    events: Arc<dyn DomainEventSink>,
}

impl InventorySyncService {
    pub fn new(
        credentials: Arc<dyn CredentialServiceTrait>,
        listings: Arc<dyn ListingRepositoryTrait>,
        sync_log: Arc<dyn SyncLogRepositoryTrait>,
        registry: Arc<ProviderRegistry>,
        events: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            credentials,
            listings,
            sync_log,
            registry,
            events,
        }
    }

    /// Propagates `quantity` to all ACTIVE listings of the product.
    ///
    /// Returns once every marketplace task has settled; per-marketplace
    /// outcomes are reported exclusively through `SyncUpdate` events.
    pub async fn sync_inventory(
        &self,
        product_id: &str,
        quantity: i64,
        user_id: &str,
    ) -> Result<()> {
        let targets: Vec<Listing> = self
            .listings
            .list_active_for_product(product_id)?
            .into_iter()
            .filter(|l| l.user_id == user_id)
            .collect();

        if targets.is_empty() {
            info!("No active listings to sync for product {}", product_id);
            return Ok(());
        }

        info!(
            "Syncing quantity {} for product {} across {} marketplace(s)",
            quantity,
            product_id,
            targets.len()
        );

        let tasks = targets.iter().map(|listing| {
            self.sync_one(listing, quantity, user_id)
        });
        join_all(tasks).await;
        Ok(())
    }

    async fn sync_one(&self, listing: &Listing, quantity: i64, user_id: &str) {
        let marketplace = listing.marketplace;

        let outcome = self
            .push_quantity(listing, quantity, user_id, marketplace)
            .await;

        match outcome {
            Ok(()) => {
                self.append_log(
                    user_id,
                    marketplace,
                    SyncStatus::Success,
                    &format!("Inventory set to {} on {}", quantity, marketplace),
                )
                .await;
                self.events.emit(DomainEvent::sync_update(
                    OPERATION,
                    SyncOutcome::Success,
                    Some(marketplace),
                    &listing.product_id,
                    None,
                ));
            }
            Err(message) => {
                warn!(
                    "Inventory sync for listing {} on {} failed: {}",
                    listing.id, marketplace, message
                );
                self.append_log(user_id, marketplace, SyncStatus::Failed, &message)
                    .await;
                self.events.emit(DomainEvent::sync_update(
                    OPERATION,
                    SyncOutcome::Failed,
                    Some(marketplace),
                    &listing.product_id,
                    Some(message),
                ));
            }
        }
    }

    /// Push the new quantity to the provider, then record it locally.
    /// The local row only moves after the provider confirms, so a failed
    /// marketplace keeps its true last-known-good quantity.
    async fn push_quantity(
        &self,
        listing: &Listing,
        quantity: i64,
        user_id: &str,
        marketplace: Marketplace,
    ) -> std::result::Result<(), String> {
        let credential = self
            .credentials
            .get_credential(user_id, marketplace)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| "Marketplace not connected".to_string())?;

        let provider = self.registry.get(marketplace).map_err(|e| e.to_string())?;

        let confirmed = provider
            .update_inventory(&listing.marketplace_listing_id, quantity, &credential)
            .await
            .map_err(|e| e.to_string())?;
        if !confirmed {
            return Err("Provider did not confirm the inventory update".to_string());
        }

        self.listings
            .update_quantity(&listing.id, quantity)
            .await
            .map_err(|e| e.to_string())
    }

    async fn append_log(
        &self,
        user_id: &str,
        marketplace: Marketplace,
        status: SyncStatus,
        message: &str,
    ) {
        let entry = NewSyncLogEntry {
            user_id: user_id.to_string(),
            marketplace,
            action: SyncAction::Sync,
            status,
            message: message.to_string(),
            cost_saved: None,
        };
        if let Err(e) = self.sync_log.append(entry).await {
            warn!("Failed to append sync log entry: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crosslist::test_support::*;
    use crate::listings::ListingStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn active_listing(id: &str, marketplace: Marketplace) -> Listing {
        let now = Utc::now().naive_utc();
        Listing {
            id: id.to_string(),
            user_id: "u1".to_string(),
            product_id: "p1".to_string(),
            marketplace,
            marketplace_listing_id: format!("mkt-{}", id),
            status: ListingStatus::Active,
            price: Decimal::new(2500, 2),
            quantity: 3,
            url: None,
            smart_relist: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(env: &TestEnv) -> InventorySyncService {
        InventorySyncService::new(
            env.credentials.clone(),
            env.listings.clone(),
            env.sync_log.clone(),
            env.registry(),
            env.events.clone(),
        )
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_last_known_good_quantity() {
        // Scenario: two active listings, the EBAY provider times out.
        let env = TestEnv::new()
            .with_credential(Marketplace::Ebay)
            .with_credential(Marketplace::Etsy)
            .with_provider(Marketplace::Ebay, ProviderScript::fail_inventory())
            .with_provider(Marketplace::Etsy, ProviderScript::succeed());
        env.listings.seed(active_listing("l-ebay", Marketplace::Ebay));
        env.listings.seed(active_listing("l-etsy", Marketplace::Etsy));

        service(&env).sync_inventory("p1", 5, "u1").await.unwrap();

        // The failed marketplace keeps its stored quantity.
        assert_eq!(env.listings.get("l-ebay").unwrap().quantity, 3);
        assert_eq!(env.listings.get("l-etsy").unwrap().quantity, 5);

        // Two distinct sync updates with different statuses.
        let statuses: Vec<(Option<Marketplace>, SyncOutcome)> = env
            .events
            .events()
            .into_iter()
            .filter_map(|e| match e {
                DomainEvent::SyncUpdate {
                    marketplace,
                    status,
                    ..
                } => Some((marketplace, status)),
                _ => None,
            })
            .collect();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.contains(&(Some(Marketplace::Ebay), SyncOutcome::Failed)));
        assert!(statuses.contains(&(Some(Marketplace::Etsy), SyncOutcome::Success)));
    }

    #[tokio::test]
    async fn test_unconnected_marketplace_reports_failure_event() {
        let env = TestEnv::new()
            .with_provider(Marketplace::Ebay, ProviderScript::succeed());
        env.listings.seed(active_listing("l-ebay", Marketplace::Ebay));

        service(&env).sync_inventory("p1", 7, "u1").await.unwrap();

        assert_eq!(env.listings.get("l-ebay").unwrap().quantity, 3);
        let events = env.events.events();
        assert!(events.iter().any(|e| matches!(
            e,
            DomainEvent::SyncUpdate {
                status: SyncOutcome::Failed,
                error: Some(message),
                ..
            } if message == "Marketplace not connected"
        )));
        assert_eq!(env.provider(Marketplace::Ebay).inventory_calls(), 0);
    }

    #[tokio::test]
    async fn test_no_active_listings_is_a_quiet_noop() {
        let env = TestEnv::new();
        service(&env).sync_inventory("p1", 2, "u1").await.unwrap();
        assert!(env.events.is_empty());
    }

    #[tokio::test]
    async fn test_only_active_listings_are_synced() {
        let env = TestEnv::new()
            .with_credential(Marketplace::Ebay)
            .with_provider(Marketplace::Ebay, ProviderScript::succeed());
        let mut expired = active_listing("l-old", Marketplace::Ebay);
        expired.status = ListingStatus::Expired;
        env.listings.seed(expired);

        service(&env).sync_inventory("p1", 9, "u1").await.unwrap();

        assert_eq!(env.provider(Marketplace::Ebay).inventory_calls(), 0);
        assert_eq!(env.listings.get("l-old").unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_sync_appends_audit_entries() {
        let env = TestEnv::new()
            .with_credential(Marketplace::Etsy)
            .with_provider(Marketplace::Etsy, ProviderScript::succeed());
        env.listings.seed(active_listing("l-etsy", Marketplace::Etsy));

        service(&env).sync_inventory("p1", 5, "u1").await.unwrap();

        let entries = env.sync_log.list_recent("u1", 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, SyncAction::Sync);
        assert_eq!(entries[0].status, SyncStatus::Success);
    }
}
