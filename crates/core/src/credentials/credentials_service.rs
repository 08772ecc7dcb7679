//! Credential service with transparent, single-flight token refresh.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::Mutex;

use super::credentials_model::{MarketplaceCredential, NewCredential};
use super::credentials_traits::{CredentialRepositoryTrait, CredentialServiceTrait};
use crate::errors::Result;
use sellbridge_marketplace::registry::ProviderRegistry;
use sellbridge_marketplace::{ApiCredential, Marketplace};

/// Service for managing marketplace credentials.
///
/// Reads go through [`get_credential`](CredentialServiceTrait::get_credential),
/// which transparently refreshes expired tokens. Refreshes are serialized
/// per (user, marketplace): several providers treat a refresh token as
/// single-use, so two concurrent refresh calls with the same token would
/// invalidate the grant. The second caller waits on the pair's lock,
/// re-reads the stored row, and finds it already refreshed.
pub struct CredentialService {
    repository: Arc<dyn CredentialRepositoryTrait>,
    registry: Arc<ProviderRegistry>,
    refresh_locks: Mutex<HashMap<(String, Marketplace), Arc<Mutex<()>>>>,
}

impl CredentialService {
    pub fn new(
        repository: Arc<dyn CredentialRepositoryTrait>,
        registry: Arc<ProviderRegistry>,
    ) -> Self {
        Self {
            repository,
            registry,
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The lock guarding refreshes for one (user, marketplace) pair.
    async fn refresh_lock(&self, user_id: &str, marketplace: Marketplace) -> Arc<Mutex<()>> {
        let mut locks = self.refresh_locks.lock().await;
        locks
            .entry((user_id.to_string(), marketplace))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Refresh an expired credential and persist the new tokens.
    ///
    /// Returns `None` when the refresh is rejected; the stored row is left
    /// untouched so the failure can be inspected, and the caller reports
    /// "reconnect required".
    async fn refresh_and_store(
        &self,
        stored: MarketplaceCredential,
        refresh_token: &str,
    ) -> Result<Option<ApiCredential>> {
        let provider = self.registry.get(stored.marketplace)?;

        let refreshed = match provider.refresh(refresh_token).await {
            Ok(credential) => credential,
            Err(e) => {
                // Refresh failures are usually terminal (revoked grant);
                // no retry here - backoff belongs to the adapters' own
                // transient-failure handling.
                warn!(
                    "Token refresh failed for user {} on {}: {}",
                    stored.user_id, stored.marketplace, e
                );
                return Ok(None);
            }
        };

        self.repository
            .update_tokens(
                &stored.id,
                refreshed.access_token.clone(),
                refreshed.refresh_token.clone(),
                refreshed.expires_at.map(|at| at.naive_utc()),
            )
            .await?;

        debug!(
            "Refreshed {} credential for user {}",
            stored.marketplace, stored.user_id
        );

        // Shop identifiers don't come back from a token refresh; carry
        // them over from the stored row.
        Ok(Some(ApiCredential {
            shop_id: stored.shop_id,
            shop_name: stored.shop_name,
            ..refreshed
        }))
    }
}

#[async_trait::async_trait]
impl CredentialServiceTrait for CredentialService {
    async fn get_credential(
        &self,
        user_id: &str,
        marketplace: Marketplace,
    ) -> Result<Option<ApiCredential>> {
        let Some(stored) = self.repository.find_active(user_id, marketplace)? else {
            return Ok(None);
        };

        if !stored.is_expired() {
            return Ok(Some(stored.to_api_credential()));
        }

        if stored.refresh_token.is_none() {
            // Expired and unrefreshable: never hand out a dead token.
            warn!(
                "Credential for user {} on {} expired with no refresh token",
                user_id, marketplace
            );
            return Ok(None);
        }

        let lock = self.refresh_lock(user_id, marketplace).await;
        let _guard = lock.lock().await;

        // Re-read under the lock: a concurrent caller may have finished
        // the refresh while we waited.
        let Some(stored) = self.repository.find_active(user_id, marketplace)? else {
            return Ok(None);
        };
        if !stored.is_expired() {
            return Ok(Some(stored.to_api_credential()));
        }
        let Some(refresh_token) = stored.refresh_token.clone() else {
            return Ok(None);
        };

        self.refresh_and_store(stored, &refresh_token).await
    }

    async fn connect(
        &self,
        user_id: &str,
        marketplace: Marketplace,
        code: &str,
    ) -> Result<MarketplaceCredential> {
        let provider = self.registry.get(marketplace)?;
        let credential = provider.exchange_code(code).await?;
        let stored = self
            .repository
            .upsert(NewCredential::from_api(user_id, marketplace, credential))
            .await?;
        debug!("Connected {} for user {}", marketplace, user_id);
        Ok(stored)
    }

    async fn disconnect(&self, user_id: &str, marketplace: Marketplace) -> Result<()> {
        self.repository.deactivate(user_id, marketplace).await
    }

    fn connected_marketplaces(&self, user_id: &str) -> Result<Vec<Marketplace>> {
        self.repository.list_active_marketplaces(user_id)
    }
}
