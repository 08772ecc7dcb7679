//! Credential repository and service traits.
//!
//! These traits define the contract for credential operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::{MarketplaceCredential, NewCredential};
use crate::errors::Result;
use sellbridge_marketplace::{ApiCredential, Marketplace};

/// Trait defining the contract for credential repository operations.
#[async_trait]
pub trait CredentialRepositoryTrait: Send + Sync {
    /// Returns the active credential for a (user, marketplace) pair.
    fn find_active(
        &self,
        user_id: &str,
        marketplace: Marketplace,
    ) -> Result<Option<MarketplaceCredential>>;

    /// Stores a credential as the pair's active one.
    ///
    /// Idempotent: any previously active row for the pair is deactivated,
    /// never deleted, so the invariant of one active row per pair holds.
    async fn upsert(&self, credential: NewCredential) -> Result<MarketplaceCredential>;

    /// Overwrites the token fields of a stored credential after a refresh.
    async fn update_tokens(
        &self,
        credential_id: &str,
        access_token: String,
        refresh_token: Option<String>,
        expires_at: Option<chrono::NaiveDateTime>,
    ) -> Result<()>;

    /// Deactivates the pair's active credential, keeping the row.
    async fn deactivate(&self, user_id: &str, marketplace: Marketplace) -> Result<()>;

    /// Marketplaces with an active credential for this user.
    fn list_active_marketplaces(&self, user_id: &str) -> Result<Vec<Marketplace>>;
}

/// Trait defining the contract for the credential service.
#[async_trait]
pub trait CredentialServiceTrait: Send + Sync {
    /// Returns a usable credential for the pair, refreshing if needed.
    ///
    /// `Ok(None)` means the marketplace is not connected or the stored
    /// credential could not be refreshed; callers should treat both as
    /// "reconnect required".
    async fn get_credential(
        &self,
        user_id: &str,
        marketplace: Marketplace,
    ) -> Result<Option<ApiCredential>>;

    /// Exchanges an OAuth authorization code and stores the credential.
    async fn connect(
        &self,
        user_id: &str,
        marketplace: Marketplace,
        code: &str,
    ) -> Result<MarketplaceCredential>;

    /// Deactivates the pair's credential.
    async fn disconnect(&self, user_id: &str, marketplace: Marketplace) -> Result<()>;

    /// Marketplaces the user has an active credential for.
    fn connected_marketplaces(&self, user_id: &str) -> Result<Vec<Marketplace>>;
}
