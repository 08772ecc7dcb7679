//! Whatnot provider stub.
//!
//! Whatnot has no public listing API. This provider exists so the
//! marketplace shows up as a known platform, but every operation reports
//! [`MarketplaceError::Unsupported`] instead of simulating success.

use async_trait::async_trait;

use crate::errors::MarketplaceError;
use crate::models::{ApiCredential, Category, ListingResult, ProductDetails, RemoteListing};
use crate::provider::MarketplaceProvider;

const PROVIDER_ID: &str = "WHATNOT";

/// Declared-only Whatnot provider.
#[derive(Debug, Clone, Default)]
pub struct WhatnotProvider;

impl WhatnotProvider {
    pub fn new() -> Self {
        Self
    }

    fn unsupported<T>(operation: &str) -> Result<T, MarketplaceError> {
        Err(MarketplaceError::Unsupported {
            operation: operation.to_string(),
            provider: PROVIDER_ID.to_string(),
        })
    }
}

#[async_trait]
impl MarketplaceProvider for WhatnotProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Whatnot"
    }

    fn is_functional(&self) -> bool {
        false
    }

    fn auth_url(&self, _state: &str) -> Result<String, MarketplaceError> {
        Self::unsupported("auth_url")
    }

    async fn exchange_code(&self, _code: &str) -> Result<ApiCredential, MarketplaceError> {
        Self::unsupported("exchange_code")
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<ApiCredential, MarketplaceError> {
        Self::unsupported("refresh")
    }

    async fn create_listing(
        &self,
        _product: &ProductDetails,
        _credential: &ApiCredential,
    ) -> Result<ListingResult, MarketplaceError> {
        Self::unsupported("create_listing")
    }

    async fn update_listing(
        &self,
        _listing_id: &str,
        _product: &ProductDetails,
        _credential: &ApiCredential,
    ) -> Result<ListingResult, MarketplaceError> {
        Self::unsupported("update_listing")
    }

    async fn delete_listing(
        &self,
        _listing_id: &str,
        _credential: &ApiCredential,
    ) -> Result<bool, MarketplaceError> {
        Self::unsupported("delete_listing")
    }

    async fn get_listing(
        &self,
        _listing_id: &str,
        _credential: &ApiCredential,
    ) -> Result<Option<RemoteListing>, MarketplaceError> {
        Self::unsupported("get_listing")
    }

    async fn get_categories(
        &self,
        _credential: &ApiCredential,
    ) -> Result<Vec<Category>, MarketplaceError> {
        Self::unsupported("get_categories")
    }

    async fn search_category(
        &self,
        _query: &str,
        _credential: &ApiCredential,
    ) -> Result<Vec<Category>, MarketplaceError> {
        Self::unsupported("search_category")
    }

    async fn update_inventory(
        &self,
        _listing_id: &str,
        _quantity: i64,
        _credential: &ApiCredential,
    ) -> Result<bool, MarketplaceError> {
        Self::unsupported("update_inventory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_operation_reports_unsupported() {
        let provider = WhatnotProvider::new();
        assert!(!provider.is_functional());
        assert!(matches!(
            provider.auth_url("state").unwrap_err(),
            MarketplaceError::Unsupported { .. }
        ));
        assert!(matches!(
            provider.exchange_code("code").await.unwrap_err(),
            MarketplaceError::Unsupported { .. }
        ));
        assert!(matches!(
            provider.refresh("token").await.unwrap_err(),
            MarketplaceError::Unsupported { .. }
        ));
    }
}
