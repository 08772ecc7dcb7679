//! Cross-listing orchestrator.
//!
//! Fans one product out to several marketplaces concurrently. Each
//! marketplace is an independent task: credential resolution, the adapter
//! call, listing persistence, and event emission all happen inside the
//! task, and one marketplace's failure never cancels or delays another's.
//! The orchestrator waits for every task to settle and returns one
//! outcome per requested marketplace.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use log::{error, info};

use super::crosslist_model::MarketplaceOutcome;
use crate::credentials::CredentialServiceTrait;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, NotificationKind};
use crate::listings::{ListingRepositoryTrait, ListingUpsert};
use crate::products::{Product, ProductReaderTrait};
use crate::sync_log::{NewSyncLogEntry, SyncAction, SyncLogRepositoryTrait, SyncStatus};
use sellbridge_marketplace::registry::ProviderRegistry;
use sellbridge_marketplace::{ListingResult, Marketplace};

const OPERATION: &str = "cross_list";

/// Orchestrates publishing one product to multiple marketplaces.
pub struct CrossListService {
    products: Arc<dyn ProductReaderTrait>,
    credentials: Arc<dyn CredentialServiceTrait>,
    listings: Arc<dyn ListingRepositoryTrait>,
    sync_log: Arc<dyn SyncLogRepositoryTrait>,
    registry: Arc<ProviderRegistry>,
    events: Arc<dyn DomainEventSink>,
}

impl CrossListService {
    pub fn new(
        products: Arc<dyn ProductReaderTrait>,
        credentials: Arc<dyn CredentialServiceTrait>,
        listings: Arc<dyn ListingRepositoryTrait>,
        sync_log: Arc<dyn SyncLogRepositoryTrait>,
        registry: Arc<ProviderRegistry>,
        events: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            products,
            credentials,
            listings,
            sync_log,
            registry,
            events,
        }
    }

    /// Publishes `product_id` to every marketplace in `marketplaces`.
    ///
    /// Returns exactly one [`MarketplaceOutcome`] per requested
    /// marketplace (duplicates in the request collapse to one entry).
    /// Only a missing/foreign product or an unavailable credential store
    /// fail the whole call; adapter failures become per-marketplace
    /// outcomes.
    pub async fn cross_list(
        &self,
        product_id: &str,
        marketplaces: &[Marketplace],
        user_id: &str,
    ) -> Result<HashMap<Marketplace, MarketplaceOutcome>> {
        let product = self
            .products
            .get_by_id(product_id)
            .await?
            .filter(|p| p.is_owned_by(user_id))
            .ok_or_else(|| Error::NotFound(format!("Product {} not found", product_id)))?;

        let mut targets: Vec<Marketplace> = Vec::new();
        for &marketplace in marketplaces {
            if !targets.contains(&marketplace) {
                targets.push(marketplace);
            }
        }

        let total = targets.len();
        let completed = Arc::new(AtomicUsize::new(0));

        info!(
            "Cross-listing product {} to {} marketplace(s) for user {}",
            product_id, total, user_id
        );

        let tasks = targets.iter().map(|&marketplace| {
            let completed = completed.clone();
            let product = &product;
            async move {
                let outcome = self.publish_one(product, marketplace, user_id).await;

                // The progress counter is the one piece of shared state
                // across marketplace tasks; the atomic increment keeps
                // the emitted current/total pairs consistent.
                let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                self.events.emit(DomainEvent::sync_progress(
                    OPERATION,
                    current,
                    total,
                    Some(marketplace),
                    &product.title,
                ));

                (marketplace, outcome)
            }
        });

        let mut results = HashMap::with_capacity(total);
        for (marketplace, outcome) in join_all(tasks).await {
            results.insert(marketplace, outcome?);
        }
        Ok(results)
    }

    /// Run one marketplace's unit of work to completion.
    ///
    /// `Err` is reserved for failures that must abort the whole
    /// cross-list (credential store unavailable); everything else folds
    /// into the returned outcome.
    async fn publish_one(
        &self,
        product: &Product,
        marketplace: Marketplace,
        user_id: &str,
    ) -> Result<MarketplaceOutcome> {
        let credential = match self.credentials.get_credential(user_id, marketplace).await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                return Ok(MarketplaceOutcome::failed("Marketplace not connected"));
            }
            // The store itself is down; no marketplace can do better.
            Err(e) => return Err(e),
        };

        let provider = match self.registry.get(marketplace) {
            Ok(provider) => provider,
            Err(e) => {
                return Ok(self
                    .record_failure(product, marketplace, user_id, SyncAction::Create, &e.to_string())
                    .await);
            }
        };

        let existing = match self.listings.find_for_publish(&product.id, marketplace) {
            Ok(existing) => existing,
            Err(e) => {
                return Ok(self
                    .record_failure(product, marketplace, user_id, SyncAction::Create, &e.to_string())
                    .await);
            }
        };

        let details = product.details();
        let (attempted_action, call) = match &existing {
            Some(listing) => (
                SyncAction::Update,
                provider.update_listing(&listing.marketplace_listing_id, &details, &credential),
            ),
            None => (
                SyncAction::Create,
                provider.create_listing(&details, &credential),
            ),
        };

        match call.await {
            Ok(result) => Ok(self
                .record_success(product, marketplace, user_id, attempted_action, result)
                .await),
            Err(e) => Ok(self
                .record_failure(product, marketplace, user_id, attempted_action, &e.to_string())
                .await),
        }
    }

    async fn record_success(
        &self,
        product: &Product,
        marketplace: Marketplace,
        user_id: &str,
        attempted_action: SyncAction,
        result: ListingResult,
    ) -> MarketplaceOutcome {
        let action = if result.smart_relist {
            SyncAction::Relist
        } else {
            attempted_action
        };
        let cost_saved = result.cost_saved;

        let upsert = ListingUpsert {
            user_id: user_id.to_string(),
            product_id: product.id.clone(),
            marketplace,
            marketplace_listing_id: result.listing_id,
            status: result.state.into(),
            price: product.price,
            quantity: product.quantity,
            url: result.url,
            smart_relist: result.smart_relist,
        };
        let listing = match self.listings.upsert(upsert).await {
            Ok(listing) => listing,
            Err(e) => {
                // The provider call went through but we lost the record;
                // surface it as a failure so the user re-syncs.
                error!(
                    "Listing persisted on {} but local upsert failed: {}",
                    marketplace, e
                );
                return self
                    .record_failure(product, marketplace, user_id, action, &e.to_string())
                    .await;
            }
        };

        let message = match action {
            SyncAction::Relist => format!("Relisted \"{}\" on {}", product.title, marketplace),
            SyncAction::Update => format!("Updated \"{}\" on {}", product.title, marketplace),
            _ => format!("Listed \"{}\" on {}", product.title, marketplace),
        };

        self.append_log(
            user_id,
            marketplace,
            action,
            SyncStatus::Success,
            &message,
            cost_saved,
        )
        .await;

        self.events.emit(DomainEvent::listing_update(
            &product.id,
            marketplace,
            listing.status.as_str(),
            &message,
        ));

        MarketplaceOutcome::succeeded(listing, cost_saved)
    }

    async fn record_failure(
        &self,
        product: &Product,
        marketplace: Marketplace,
        user_id: &str,
        action: SyncAction,
        error_message: &str,
    ) -> MarketplaceOutcome {
        error!(
            "Cross-listing product {} to {} failed: {}",
            product.id, marketplace, error_message
        );

        self.append_log(
            user_id,
            marketplace,
            action,
            SyncStatus::Failed,
            error_message,
            None,
        )
        .await;

        self.events.emit(DomainEvent::notification(
            NotificationKind::Error,
            format!("{} listing failed", marketplace),
            format!("\"{}\": {}", product.title, error_message),
        ));

        MarketplaceOutcome::failed(error_message)
    }

    /// Append to the audit log, best-effort: losing a log line must not
    /// turn a successful publish into a reported failure.
    async fn append_log(
        &self,
        user_id: &str,
        marketplace: Marketplace,
        action: SyncAction,
        status: SyncStatus,
        message: &str,
        cost_saved: Option<rust_decimal::Decimal>,
    ) {
        let entry = NewSyncLogEntry {
            user_id: user_id.to_string(),
            marketplace,
            action,
            status,
            message: message.to_string(),
            cost_saved,
        };
        if let Err(e) = self.sync_log.append(entry).await {
            error!("Failed to append sync log entry: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crosslist::test_support::*;
    use crate::listings::ListingStatus;
    use rust_decimal_macros::dec;

    fn service(env: &TestEnv) -> CrossListService {
        CrossListService::new(
            env.products.clone(),
            env.credentials.clone(),
            env.listings.clone(),
            env.sync_log.clone(),
            env.registry(),
            env.events.clone(),
        )
    }

    #[tokio::test]
    async fn test_result_map_has_one_entry_per_marketplace() {
        let env = TestEnv::new()
            .with_product(product("p1", "u1"))
            .with_credential(Marketplace::Ebay)
            .with_credential(Marketplace::Etsy)
            .with_provider(Marketplace::Ebay, ProviderScript::succeed())
            .with_provider(Marketplace::Etsy, ProviderScript::succeed());

        let results = service(&env)
            .cross_list(
                "p1",
                // Duplicate request entries collapse.
                &[Marketplace::Ebay, Marketplace::Etsy, Marketplace::Ebay],
                "u1",
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[&Marketplace::Ebay].success);
        assert!(results[&Marketplace::Etsy].success);
    }

    #[tokio::test]
    async fn test_missing_credential_and_success_scenario() {
        // Scenario: EBAY has no credential, ETSY succeeds.
        let env = TestEnv::new()
            .with_product(product("p1", "u1"))
            .with_credential(Marketplace::Etsy)
            .with_provider(Marketplace::Ebay, ProviderScript::succeed())
            .with_provider(Marketplace::Etsy, ProviderScript::succeed());

        let results = service(&env)
            .cross_list("p1", &[Marketplace::Ebay, Marketplace::Etsy], "u1")
            .await
            .unwrap();

        let ebay = &results[&Marketplace::Ebay];
        assert!(!ebay.success);
        assert_eq!(ebay.error.as_deref(), Some("Marketplace not connected"));
        assert!(ebay.listing.is_none());

        let etsy = &results[&Marketplace::Etsy];
        assert!(etsy.success);
        assert!(etsy.listing.is_some());

        // No adapter call went out for the unconnected marketplace.
        assert_eq!(env.provider(Marketplace::Ebay).create_calls(), 0);
        assert_eq!(env.provider(Marketplace::Etsy).create_calls(), 1);
    }

    #[tokio::test]
    async fn test_progress_events_cover_every_marketplace() {
        let env = TestEnv::new()
            .with_product(product("p1", "u1"))
            .with_credential(Marketplace::Etsy)
            .with_provider(Marketplace::Ebay, ProviderScript::succeed())
            .with_provider(Marketplace::Etsy, ProviderScript::succeed());

        service(&env)
            .cross_list("p1", &[Marketplace::Ebay, Marketplace::Etsy], "u1")
            .await
            .unwrap();

        let mut currents: Vec<usize> = env
            .events
            .events()
            .into_iter()
            .filter_map(|e| match e {
                DomainEvent::SyncProgress { current, total, .. } => {
                    assert_eq!(total, 2);
                    Some(current)
                }
                _ => None,
            })
            .collect();
        currents.sort_unstable();
        assert_eq!(currents, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_unknown_product_is_fatal() {
        let env = TestEnv::new();
        let err = service(&env)
            .cross_list("missing", &[Marketplace::Ebay], "u1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_foreign_product_is_fatal() {
        let env = TestEnv::new().with_product(product("p1", "someone-else"));
        let err = service(&env)
            .cross_list("p1", &[Marketplace::Ebay], "u1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_second_publish_updates_instead_of_duplicating() {
        let env = TestEnv::new()
            .with_product(product("p1", "u1"))
            .with_credential(Marketplace::Ebay)
            .with_provider(Marketplace::Ebay, ProviderScript::succeed());
        let service = service(&env);

        service
            .cross_list("p1", &[Marketplace::Ebay], "u1")
            .await
            .unwrap();
        service
            .cross_list("p1", &[Marketplace::Ebay], "u1")
            .await
            .unwrap();

        let provider = env.provider(Marketplace::Ebay);
        assert_eq!(provider.create_calls(), 1);
        assert_eq!(provider.update_calls(), 1);

        // One ACTIVE row per (product, marketplace).
        let active = env
            .listings
            .list_active_for_product("p1")
            .unwrap()
            .into_iter()
            .filter(|l| l.marketplace == Marketplace::Ebay)
            .count();
        assert_eq!(active, 1);
    }

    #[tokio::test]
    async fn test_validation_failure_reaches_no_network() {
        // Scenario: price = 0 raises a validation error before any
        // outbound call is made.
        let mut bad = product("p1", "u1");
        bad.price = dec!(0);
        let env = TestEnv::new()
            .with_product(bad)
            .with_credential(Marketplace::Ebay)
            .with_provider(Marketplace::Ebay, ProviderScript::succeed());

        let results = service(&env)
            .cross_list("p1", &[Marketplace::Ebay], "u1")
            .await
            .unwrap();

        let outcome = &results[&Marketplace::Ebay];
        assert!(!outcome.success);
        assert!(outcome.error.as_deref().unwrap().contains("price"));
        assert_eq!(env.provider(Marketplace::Ebay).network_calls(), 0);
    }

    #[tokio::test]
    async fn test_smart_relist_outcome_carries_saving_and_relist_action() {
        let env = TestEnv::new()
            .with_product(product("p1", "u1"))
            .with_credential(Marketplace::Etsy)
            .with_provider(Marketplace::Etsy, ProviderScript::smart_relist());

        let results = service(&env)
            .cross_list("p1", &[Marketplace::Etsy], "u1")
            .await
            .unwrap();

        let outcome = &results[&Marketplace::Etsy];
        assert!(outcome.success);
        assert_eq!(outcome.cost_saved, Some(dec!(0.20)));
        assert!(outcome.listing.as_ref().unwrap().smart_relist);

        let entries = env.sync_log.list_recent("u1", 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, SyncAction::Relist);
        assert_eq!(entries[0].status, SyncStatus::Success);
        assert_eq!(entries[0].cost_saved, Some(dec!(0.20)));
    }

    #[tokio::test]
    async fn test_one_failure_never_aborts_siblings() {
        let env = TestEnv::new()
            .with_product(product("p1", "u1"))
            .with_credential(Marketplace::Ebay)
            .with_credential(Marketplace::Etsy)
            .with_provider(Marketplace::Ebay, ProviderScript::fail_provider())
            .with_provider(Marketplace::Etsy, ProviderScript::succeed());

        let results = service(&env)
            .cross_list("p1", &[Marketplace::Ebay, Marketplace::Etsy], "u1")
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(!results[&Marketplace::Ebay].success);
        assert!(results[&Marketplace::Etsy].success);

        // The failure produced an audit entry and a user notification.
        let entries = env.sync_log.list_recent("u1", 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .any(|e| e.marketplace == Marketplace::Ebay && e.status == SyncStatus::Failed));
        assert!(env.events.events().iter().any(|e| matches!(
            e,
            DomainEvent::Notification {
                kind: NotificationKind::Error,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn test_successful_publish_upserts_and_logs() {
        let env = TestEnv::new()
            .with_product(product("p1", "u1"))
            .with_credential(Marketplace::Ebay)
            .with_provider(Marketplace::Ebay, ProviderScript::succeed());

        let results = service(&env)
            .cross_list("p1", &[Marketplace::Ebay], "u1")
            .await
            .unwrap();

        let listing = results[&Marketplace::Ebay].listing.clone().unwrap();
        assert_eq!(listing.product_id, "p1");
        assert_eq!(listing.status, ListingStatus::Active);

        let entries = env.sync_log.list_recent("u1", 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, SyncAction::Create);
        assert_eq!(entries[0].status, SyncStatus::Success);

        assert!(env
            .events
            .events()
            .iter()
            .any(|e| matches!(e, DomainEvent::ListingUpdate { .. })));
    }
}
