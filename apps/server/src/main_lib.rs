//! Application state construction and tracing setup.

use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::events::{BusEventSink, EventBus};
use sellbridge_core::credentials::{CredentialService, CredentialServiceTrait};
use sellbridge_core::crosslist::{CrossListService, InventorySyncService};
use sellbridge_core::events::DomainEventSink;
use sellbridge_core::listings::ListingService;
use sellbridge_core::sync_log::SyncLogRepositoryTrait;
use sellbridge_marketplace::registry::ProviderRegistry;
use sellbridge_marketplace::{EbayProvider, EtsyProvider, Marketplace, WhatnotProvider};
use sellbridge_storage_sqlite::credentials::CredentialRepository;
use sellbridge_storage_sqlite::db::{self, spawn_writer};
use sellbridge_storage_sqlite::listings::ListingRepository;
use sellbridge_storage_sqlite::products::ProductRepository;
use sellbridge_storage_sqlite::sync_log::SyncLogRepository;

pub struct AppState {
    pub credential_service: Arc<dyn CredentialServiceTrait>,
    pub crosslist_service: Arc<CrossListService>,
    pub inventory_service: Arc<InventorySyncService>,
    pub listing_service: Arc<ListingService>,
    pub sync_log: Arc<dyn SyncLogRepositoryTrait>,
    pub registry: Arc<ProviderRegistry>,
    pub event_bus: EventBus,
}

pub fn init_tracing() {
    let log_format = std::env::var("SB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Builds the provider registry from the configured OAuth apps.
///
/// Whatnot always registers: it shows up as a known marketplace even
/// though every listing operation reports it as unsupported.
fn build_registry(config: &Config) -> Arc<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();

    if let Some(ebay) = config.ebay.clone() {
        registry.register(Marketplace::Ebay, Arc::new(EbayProvider::new(ebay)));
    } else {
        tracing::warn!("eBay OAuth app not configured; EBAY is unavailable");
    }

    if let Some(etsy) = config.etsy.clone() {
        registry.register(Marketplace::Etsy, Arc::new(EtsyProvider::new(etsy)));
    } else {
        tracing::warn!("Etsy OAuth app not configured; ETSY is unavailable");
    }

    registry.register(Marketplace::Whatnot, Arc::new(WhatnotProvider::new()));

    Arc::new(registry)
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let credential_repo = Arc::new(CredentialRepository::new(pool.clone(), writer.clone()));
    let listing_repo = Arc::new(ListingRepository::new(pool.clone(), writer.clone()));
    let sync_log_repo = Arc::new(SyncLogRepository::new(pool.clone(), writer.clone()));
    let product_repo = Arc::new(ProductRepository::new(pool.clone(), writer.clone()));

    let registry = build_registry(config);

    let event_bus = EventBus::new();
    let event_sink: Arc<dyn DomainEventSink> = Arc::new(BusEventSink::new(event_bus.clone()));

    let credential_service: Arc<dyn CredentialServiceTrait> = Arc::new(CredentialService::new(
        credential_repo.clone(),
        registry.clone(),
    ));

    let crosslist_service = Arc::new(CrossListService::new(
        product_repo.clone(),
        credential_service.clone(),
        listing_repo.clone(),
        sync_log_repo.clone(),
        registry.clone(),
        event_sink.clone(),
    ));

    let inventory_service = Arc::new(InventorySyncService::new(
        credential_service.clone(),
        listing_repo.clone(),
        sync_log_repo.clone(),
        registry.clone(),
        event_sink,
    ));

    let listing_service = Arc::new(ListingService::new(
        listing_repo,
        credential_service.clone(),
        registry.clone(),
    ));

    Ok(Arc::new(AppState {
        credential_service,
        crosslist_service,
        inventory_service,
        listing_service,
        sync_log: sync_log_repo,
        registry,
        event_bus,
    }))
}
