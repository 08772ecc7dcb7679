//! Marketplace provider trait definition.
//!
//! This module defines the core `MarketplaceProvider` trait that all
//! selling-platform integrations must implement.

use async_trait::async_trait;

use crate::errors::MarketplaceError;
use crate::models::{
    ApiCredential, Category, ListingAnalytics, ListingResult, ProductDetails, RemoteListing,
};

/// Trait for marketplace providers.
///
/// Implement this trait to add support for a new selling platform. Each
/// implementation translates the unified product/listing model into the
/// provider's wire protocol; callers never see provider-specific payloads.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use sellbridge_marketplace::provider::MarketplaceProvider;
///
/// struct MyMarketplace {
///     client_id: String,
/// }
///
/// #[async_trait]
/// impl MarketplaceProvider for MyMarketplace {
///     fn id(&self) -> &'static str {
///         "MY_MARKETPLACE"
///     }
///
///     // ... implement auth and listing methods
/// }
/// ```
#[async_trait]
pub trait MarketplaceProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "EBAY", "ETSY", etc.
    /// Used for logging, error attribution, and registry lookup.
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// Whether this provider has a working listing implementation.
    ///
    /// Declared stubs return false so the API layer can list them as
    /// "coming soon" without letting orchestration route work to them.
    fn is_functional(&self) -> bool {
        true
    }

    /// Builds the provider's OAuth consent URL.
    ///
    /// `state` is an opaque, caller-supplied anti-CSRF token and is
    /// embedded verbatim. Fails with [`MarketplaceError::Unsupported`]
    /// for providers without an OAuth flow.
    fn auth_url(&self, state: &str) -> Result<String, MarketplaceError>;

    /// Exchanges an OAuth authorization code for a token pair.
    async fn exchange_code(&self, code: &str) -> Result<ApiCredential, MarketplaceError>;

    /// Exchanges a refresh token for a new access token.
    ///
    /// Fails with [`MarketplaceError::Authentication`] if the refresh
    /// token is invalid or expired.
    async fn refresh(&self, refresh_token: &str) -> Result<ApiCredential, MarketplaceError>;

    /// Creates a listing for the product.
    ///
    /// Validates the product first ([`ProductDetails::validate`]); a bad
    /// product never reaches the network. Then performs whatever
    /// multi-step protocol the provider requires and returns a normalized
    /// result.
    async fn create_listing(
        &self,
        product: &ProductDetails,
        credential: &ApiCredential,
    ) -> Result<ListingResult, MarketplaceError>;

    /// Updates an existing listing with fresh product content.
    async fn update_listing(
        &self,
        listing_id: &str,
        product: &ProductDetails,
        credential: &ApiCredential,
    ) -> Result<ListingResult, MarketplaceError>;

    /// Ends/removes a listing. Returns true when the provider confirmed.
    async fn delete_listing(
        &self,
        listing_id: &str,
        credential: &ApiCredential,
    ) -> Result<bool, MarketplaceError>;

    /// Reads a listing back from the provider.
    ///
    /// Returns `Ok(None)` when the provider reports 404 - an absent
    /// listing is a normal read outcome, not an error.
    async fn get_listing(
        &self,
        listing_id: &str,
        credential: &ApiCredential,
    ) -> Result<Option<RemoteListing>, MarketplaceError>;

    /// Fetches the provider's top-level category taxonomy.
    async fn get_categories(
        &self,
        credential: &ApiCredential,
    ) -> Result<Vec<Category>, MarketplaceError>;

    /// Searches the category taxonomy for nodes matching `query`.
    async fn search_category(
        &self,
        query: &str,
        credential: &ApiCredential,
    ) -> Result<Vec<Category>, MarketplaceError>;

    /// Sets the available quantity on a listing.
    async fn update_inventory(
        &self,
        listing_id: &str,
        quantity: i64,
        credential: &ApiCredential,
    ) -> Result<bool, MarketplaceError>;

    /// Fetches listing metrics, best-effort.
    ///
    /// Failures collapse to an empty result rather than propagating.
    /// Default implementation reports nothing.
    async fn get_listing_analytics(
        &self,
        listing_id: &str,
        credential: &ApiCredential,
    ) -> ListingAnalytics {
        let _ = (listing_id, credential);
        ListingAnalytics::default()
    }
}
