//! Shared in-memory fakes for orchestrator and inventory sync tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::credentials::{CredentialServiceTrait, MarketplaceCredential};
use crate::errors::{Error, Result};
use crate::events::MockDomainEventSink;
use crate::listings::{Listing, ListingRepositoryTrait, ListingStatus, ListingUpsert};
use crate::products::{Product, ProductReaderTrait};
use crate::sync_log::{NewSyncLogEntry, SyncLogEntry, SyncLogRepositoryTrait};
use sellbridge_marketplace::errors::MarketplaceError;
use sellbridge_marketplace::registry::ProviderRegistry;
use sellbridge_marketplace::{
    ApiCredential, Category, ListingResult, Marketplace, MarketplaceProvider, ProductDetails,
    RemoteListing, RemoteListingState,
};

pub fn product(id: &str, user_id: &str) -> Product {
    let now = Utc::now().naive_utc();
    Product {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: "Test product".to_string(),
        description: "A product used in tests.".to_string(),
        price: Decimal::new(2500, 2),
        quantity: 3,
        images: vec!["https://img.example.com/1.jpg".to_string()],
        sku: "SKU-1".to_string(),
        brand: None,
        condition: None,
        tags: vec![],
        attributes: HashMap::new(),
        created_at: now,
        updated_at: now,
    }
}

// ----------------------------------------------------------------------
// Product reader
// ----------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryProductReader {
    products: Mutex<HashMap<String, Product>>,
}

#[async_trait]
impl ProductReaderTrait for InMemoryProductReader {
    async fn get_by_id(&self, product_id: &str) -> Result<Option<Product>> {
        Ok(self.products.lock().unwrap().get(product_id).cloned())
    }
}

// ----------------------------------------------------------------------
// Credential service backed by a set of connected marketplaces
// ----------------------------------------------------------------------

#[derive(Default)]
pub struct StaticCredentialService {
    connected: Mutex<HashSet<Marketplace>>,
}

#[async_trait]
impl CredentialServiceTrait for StaticCredentialService {
    async fn get_credential(
        &self,
        _user_id: &str,
        marketplace: Marketplace,
    ) -> Result<Option<ApiCredential>> {
        if !self.connected.lock().unwrap().contains(&marketplace) {
            return Ok(None);
        }
        Ok(Some(ApiCredential {
            access_token: format!("token-{}", marketplace),
            refresh_token: None,
            expires_at: None,
            shop_id: Some("shop-1".to_string()),
            shop_name: None,
        }))
    }

    async fn connect(
        &self,
        _user_id: &str,
        _marketplace: Marketplace,
        _code: &str,
    ) -> Result<MarketplaceCredential> {
        Err(Error::Unexpected(
            "StaticCredentialService does not build credential rows".to_string(),
        ))
    }

    async fn disconnect(&self, _user_id: &str, marketplace: Marketplace) -> Result<()> {
        self.connected.lock().unwrap().remove(&marketplace);
        Ok(())
    }

    fn connected_marketplaces(&self, _user_id: &str) -> Result<Vec<Marketplace>> {
        Ok(self.connected.lock().unwrap().iter().copied().collect())
    }
}

// ----------------------------------------------------------------------
// Scripted provider
// ----------------------------------------------------------------------

/// How a [`ScriptedProvider`] behaves on listing/inventory calls.
#[derive(Clone, Copy, Debug)]
pub enum ProviderScript {
    Succeed,
    SmartRelist,
    FailProvider,
    FailInventory,
    ReportState(RemoteListingState),
    ReportMissing,
}

impl ProviderScript {
    pub fn succeed() -> Self {
        Self::Succeed
    }
    pub fn smart_relist() -> Self {
        Self::SmartRelist
    }
    pub fn fail_provider() -> Self {
        Self::FailProvider
    }
    pub fn fail_inventory() -> Self {
        Self::FailInventory
    }
    pub fn report_state(state: RemoteListingState) -> Self {
        Self::ReportState(state)
    }
    pub fn report_missing() -> Self {
        Self::ReportMissing
    }
}

/// Counts calls and answers according to its script. Validation runs
/// before the network counter moves, mirroring the real providers.
pub struct ScriptedProvider {
    script: ProviderScript,
    create: AtomicU32,
    update: AtomicU32,
    inventory: AtomicU32,
    network: AtomicU32,
}

impl ScriptedProvider {
    pub fn new(script: ProviderScript) -> Self {
        Self {
            script,
            create: AtomicU32::new(0),
            update: AtomicU32::new(0),
            inventory: AtomicU32::new(0),
            network: AtomicU32::new(0),
        }
    }

    pub fn create_calls(&self) -> u32 {
        self.create.load(Ordering::SeqCst)
    }
    pub fn update_calls(&self) -> u32 {
        self.update.load(Ordering::SeqCst)
    }
    pub fn inventory_calls(&self) -> u32 {
        self.inventory.load(Ordering::SeqCst)
    }
    pub fn network_calls(&self) -> u32 {
        self.network.load(Ordering::SeqCst)
    }

    fn listing_result(&self) -> std::result::Result<ListingResult, MarketplaceError> {
        match self.script {
            ProviderScript::FailProvider => Err(MarketplaceError::Provider {
                provider: "SCRIPTED".to_string(),
                message: "provider rejected the listing".to_string(),
            }),
            ProviderScript::SmartRelist => Ok(ListingResult {
                listing_id: "RELIST-1".to_string(),
                url: Some("https://market.example.com/RELIST-1".to_string()),
                state: RemoteListingState::Active,
                cost_saved: Some(Decimal::new(20, 2)),
                smart_relist: true,
            }),
            _ => Ok(ListingResult {
                listing_id: "NEW-1".to_string(),
                url: Some("https://market.example.com/NEW-1".to_string()),
                state: RemoteListingState::Active,
                cost_saved: None,
                smart_relist: false,
            }),
        }
    }

    fn unsupported<T>(op: &str) -> std::result::Result<T, MarketplaceError> {
        Err(MarketplaceError::Unsupported {
            operation: op.to_string(),
            provider: "SCRIPTED".to_string(),
        })
    }
}

#[async_trait]
impl MarketplaceProvider for ScriptedProvider {
    fn id(&self) -> &'static str {
        "SCRIPTED"
    }

    fn display_name(&self) -> &'static str {
        "Scripted"
    }

    fn auth_url(&self, state: &str) -> std::result::Result<String, MarketplaceError> {
        Ok(format!("https://scripted.example.com/auth?state={}", state))
    }

    async fn exchange_code(
        &self,
        _code: &str,
    ) -> std::result::Result<ApiCredential, MarketplaceError> {
        Self::unsupported("exchange_code")
    }

    async fn refresh(
        &self,
        _refresh_token: &str,
    ) -> std::result::Result<ApiCredential, MarketplaceError> {
        Self::unsupported("refresh")
    }

    async fn create_listing(
        &self,
        product: &ProductDetails,
        _credential: &ApiCredential,
    ) -> std::result::Result<ListingResult, MarketplaceError> {
        product.validate()?;
        self.network.fetch_add(1, Ordering::SeqCst);
        self.create.fetch_add(1, Ordering::SeqCst);
        self.listing_result()
    }

    async fn update_listing(
        &self,
        _listing_id: &str,
        product: &ProductDetails,
        _credential: &ApiCredential,
    ) -> std::result::Result<ListingResult, MarketplaceError> {
        product.validate()?;
        self.network.fetch_add(1, Ordering::SeqCst);
        self.update.fetch_add(1, Ordering::SeqCst);
        self.listing_result()
    }

    async fn delete_listing(
        &self,
        _listing_id: &str,
        _credential: &ApiCredential,
    ) -> std::result::Result<bool, MarketplaceError> {
        Self::unsupported("delete_listing")
    }

    async fn get_listing(
        &self,
        listing_id: &str,
        _credential: &ApiCredential,
    ) -> std::result::Result<Option<RemoteListing>, MarketplaceError> {
        self.network.fetch_add(1, Ordering::SeqCst);
        match self.script {
            ProviderScript::ReportState(state) => Ok(Some(RemoteListing {
                listing_id: listing_id.to_string(),
                title: "Remote listing".to_string(),
                price: None,
                quantity: Some(1),
                state,
                url: None,
                sku: None,
            })),
            ProviderScript::ReportMissing => Ok(None),
            _ => Self::unsupported("get_listing"),
        }
    }

    async fn get_categories(
        &self,
        _credential: &ApiCredential,
    ) -> std::result::Result<Vec<Category>, MarketplaceError> {
        Self::unsupported("get_categories")
    }

    async fn search_category(
        &self,
        _query: &str,
        _credential: &ApiCredential,
    ) -> std::result::Result<Vec<Category>, MarketplaceError> {
        Self::unsupported("search_category")
    }

    async fn update_inventory(
        &self,
        _listing_id: &str,
        _quantity: i64,
        _credential: &ApiCredential,
    ) -> std::result::Result<bool, MarketplaceError> {
        self.network.fetch_add(1, Ordering::SeqCst);
        self.inventory.fetch_add(1, Ordering::SeqCst);
        match self.script {
            ProviderScript::FailInventory => Err(MarketplaceError::Timeout {
                provider: "SCRIPTED".to_string(),
            }),
            _ => Ok(true),
        }
    }
}

// ----------------------------------------------------------------------
// Listing repository
// ----------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryListingRepository {
    rows: Mutex<Vec<Listing>>,
}

impl InMemoryListingRepository {
    pub fn seed(&self, listing: Listing) {
        self.rows.lock().unwrap().push(listing);
    }

    pub fn get(&self, listing_id: &str) -> Option<Listing> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == listing_id)
            .cloned()
    }
}

#[async_trait]
impl ListingRepositoryTrait for InMemoryListingRepository {
    fn find_for_publish(
        &self,
        product_id: &str,
        marketplace: Marketplace,
    ) -> Result<Option<Listing>> {
        let rows = self.rows.lock().unwrap();
        let candidates: Vec<&Listing> = rows
            .iter()
            .filter(|l| l.product_id == product_id && l.marketplace == marketplace)
            .collect();
        Ok(candidates
            .iter()
            .find(|l| l.status == ListingStatus::Active)
            .or_else(|| {
                candidates
                    .iter()
                    .find(|l| l.status == ListingStatus::Expired)
            })
            .map(|l| (**l).clone()))
    }

    async fn upsert(&self, upsert: ListingUpsert) -> Result<Listing> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now().naive_utc();

        if let Some(row) = rows
            .iter_mut()
            .find(|l| l.product_id == upsert.product_id && l.marketplace == upsert.marketplace)
        {
            row.marketplace_listing_id = upsert.marketplace_listing_id;
            row.status = upsert.status;
            row.price = upsert.price;
            row.quantity = upsert.quantity;
            row.url = upsert.url;
            row.smart_relist = upsert.smart_relist;
            row.updated_at = now;
            return Ok(row.clone());
        }

        let listing = Listing {
            id: format!("lst-{}", rows.len() + 1),
            user_id: upsert.user_id,
            product_id: upsert.product_id,
            marketplace: upsert.marketplace,
            marketplace_listing_id: upsert.marketplace_listing_id,
            status: upsert.status,
            price: upsert.price,
            quantity: upsert.quantity,
            url: upsert.url,
            smart_relist: upsert.smart_relist,
            created_at: now,
            updated_at: now,
        };
        rows.push(listing.clone());
        Ok(listing)
    }

    fn list_active_for_product(&self, product_id: &str) -> Result<Vec<Listing>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.product_id == product_id && l.status == ListingStatus::Active)
            .cloned()
            .collect())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Listing>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_quantity(&self, listing_id: &str, quantity: i64) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|l| l.id == listing_id) {
            row.quantity = quantity;
            row.updated_at = Utc::now().naive_utc();
        }
        Ok(())
    }

    async fn update_status(&self, listing_id: &str, status: ListingStatus) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|l| l.id == listing_id) {
            row.status = status;
            row.updated_at = Utc::now().naive_utc();
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Sync log repository
// ----------------------------------------------------------------------

#[derive(Default)]
pub struct InMemorySyncLogRepository {
    entries: Mutex<Vec<SyncLogEntry>>,
}

#[async_trait]
impl SyncLogRepositoryTrait for InMemorySyncLogRepository {
    async fn append(&self, entry: NewSyncLogEntry) -> Result<SyncLogEntry> {
        let mut entries = self.entries.lock().unwrap();
        let stored = SyncLogEntry {
            id: format!("log-{}", entries.len() + 1),
            user_id: entry.user_id,
            marketplace: entry.marketplace,
            action: entry.action,
            status: entry.status,
            message: entry.message,
            cost_saved: entry.cost_saved,
            created_at: Utc::now().naive_utc(),
        };
        entries.push(stored.clone());
        Ok(stored)
    }

    fn list_recent(&self, user_id: &str, limit: i64) -> Result<Vec<SyncLogEntry>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn total_cost_saved(&self, user_id: &str) -> Result<Decimal> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter_map(|e| e.cost_saved)
            .sum())
    }
}

// ----------------------------------------------------------------------
// Test environment
// ----------------------------------------------------------------------

pub struct TestEnv {
    pub products: Arc<InMemoryProductReader>,
    pub credentials: Arc<StaticCredentialService>,
    pub listings: Arc<InMemoryListingRepository>,
    pub sync_log: Arc<InMemorySyncLogRepository>,
    pub events: Arc<MockDomainEventSink>,
    providers: HashMap<Marketplace, Arc<ScriptedProvider>>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            products: Arc::new(InMemoryProductReader::default()),
            credentials: Arc::new(StaticCredentialService::default()),
            listings: Arc::new(InMemoryListingRepository::default()),
            sync_log: Arc::new(InMemorySyncLogRepository::default()),
            events: Arc::new(MockDomainEventSink::new()),
            providers: HashMap::new(),
        }
    }

    pub fn with_product(self, product: Product) -> Self {
        self.products
            .products
            .lock()
            .unwrap()
            .insert(product.id.clone(), product);
        self
    }

    pub fn with_credential(self, marketplace: Marketplace) -> Self {
        self.credentials
            .connected
            .lock()
            .unwrap()
            .insert(marketplace);
        self
    }

    pub fn with_provider(mut self, marketplace: Marketplace, script: ProviderScript) -> Self {
        self.providers
            .insert(marketplace, Arc::new(ScriptedProvider::new(script)));
        self
    }

    pub fn provider(&self, marketplace: Marketplace) -> Arc<ScriptedProvider> {
        self.providers[&marketplace].clone()
    }

    pub fn registry(&self) -> Arc<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        for (&marketplace, provider) in &self.providers {
            registry.register(marketplace, provider.clone());
        }
        Arc::new(registry)
    }
}
