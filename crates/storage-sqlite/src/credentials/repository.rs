//! Diesel-backed credential repository.

use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::DieselErrorExt;
use crate::schema::marketplace_credentials;
use crate::schema::marketplace_credentials::dsl::*;

use super::model::MarketplaceCredentialDB;
use sellbridge_core::credentials::{
    CredentialRepositoryTrait, MarketplaceCredential, NewCredential,
};
use sellbridge_core::errors::Result;
use sellbridge_marketplace::Marketplace;

/// Repository for managing credential data in the database.
pub struct CredentialRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CredentialRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CredentialRepositoryTrait for CredentialRepository {
    fn find_active(
        &self,
        user: &str,
        market: Marketplace,
    ) -> Result<Option<MarketplaceCredential>> {
        let mut conn = get_connection(&self.pool)?;

        let row = marketplace_credentials
            .select(MarketplaceCredentialDB::as_select())
            .filter(user_id.eq(user))
            .filter(marketplace.eq(market.as_str()))
            .filter(is_active.eq(true))
            .order(updated_at.desc())
            .first::<MarketplaceCredentialDB>(&mut conn)
            .optional()
            .map_err(|e| e.into_core_error())?;

        row.map(MarketplaceCredential::try_from).transpose()
    }

    async fn upsert(&self, credential: NewCredential) -> Result<MarketplaceCredential> {
        self.writer
            .exec(move |conn| {
                // Retire any previously active row for the pair first, so
                // the one-active-credential invariant holds. Old rows are
                // kept for audit.
                diesel::update(
                    marketplace_credentials
                        .filter(user_id.eq(&credential.user_id))
                        .filter(marketplace.eq(credential.marketplace.as_str()))
                        .filter(is_active.eq(true)),
                )
                .set(is_active.eq(false))
                .execute(conn)
                .map_err(|e| e.into_core_error())?;

                let row: MarketplaceCredentialDB = credential.into();
                diesel::insert_into(marketplace_credentials::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|e| e.into_core_error())?;

                MarketplaceCredential::try_from(row)
            })
            .await
    }

    async fn update_tokens(
        &self,
        credential_id: &str,
        new_access_token: String,
        new_refresh_token: Option<String>,
        new_expires_at: Option<chrono::NaiveDateTime>,
    ) -> Result<()> {
        let row_id = credential_id.to_string();
        self.writer
            .exec(move |conn| {
                let now = chrono::Utc::now().naive_utc();
                // A refresh that doesn't rotate the refresh token must not
                // erase the stored one.
                match new_refresh_token {
                    Some(rt) => diesel::update(marketplace_credentials.find(&row_id))
                        .set((
                            access_token.eq(new_access_token),
                            refresh_token.eq(rt),
                            expires_at.eq(new_expires_at),
                            updated_at.eq(now),
                        ))
                        .execute(conn),
                    None => diesel::update(marketplace_credentials.find(&row_id))
                        .set((
                            access_token.eq(new_access_token),
                            expires_at.eq(new_expires_at),
                            updated_at.eq(now),
                        ))
                        .execute(conn),
                }
                .map_err(|e| e.into_core_error())?;
                Ok(())
            })
            .await
    }

    async fn deactivate(&self, user: &str, market: Marketplace) -> Result<()> {
        let user = user.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(
                    marketplace_credentials
                        .filter(user_id.eq(user))
                        .filter(marketplace.eq(market.as_str())),
                )
                .set((
                    is_active.eq(false),
                    updated_at.eq(chrono::Utc::now().naive_utc()),
                ))
                .execute(conn)
                .map_err(|e| e.into_core_error())?;
                Ok(())
            })
            .await
    }

    fn list_active_marketplaces(&self, user: &str) -> Result<Vec<Marketplace>> {
        let mut conn = get_connection(&self.pool)?;

        let names: Vec<String> = marketplace_credentials
            .filter(user_id.eq(user))
            .filter(is_active.eq(true))
            .select(marketplace)
            .distinct()
            .load::<String>(&mut conn)
            .map_err(|e| e.into_core_error())?;

        // Unknown names (from a newer schema version) are skipped rather
        // than failing the whole listing.
        Ok(names.iter().filter_map(|n| n.parse().ok()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use chrono::{Duration, Utc};

    fn new_credential(market: Marketplace) -> NewCredential {
        NewCredential {
            user_id: "u1".to_string(),
            marketplace: market,
            access_token: "token-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            expires_at: Some(Utc::now().naive_utc() + Duration::hours(2)),
            shop_id: None,
            shop_name: Some("Test Shop".to_string()),
        }
    }

    #[tokio::test]
    async fn test_upsert_and_find_active() {
        let (_dir, pool, writer) = test_db::setup();
        let repo = CredentialRepository::new(pool, writer);

        assert!(repo.find_active("u1", Marketplace::Etsy).unwrap().is_none());

        let stored = repo.upsert(new_credential(Marketplace::Etsy)).await.unwrap();
        assert!(stored.is_active);

        let found = repo.find_active("u1", Marketplace::Etsy).unwrap().unwrap();
        assert_eq!(found.id, stored.id);
        assert_eq!(found.access_token, "token-1");
    }

    #[tokio::test]
    async fn test_reconnect_keeps_single_active_row() {
        let (_dir, pool, writer) = test_db::setup();
        let repo = CredentialRepository::new(pool.clone(), writer);

        let first = repo.upsert(new_credential(Marketplace::Ebay)).await.unwrap();
        let mut second_payload = new_credential(Marketplace::Ebay);
        second_payload.access_token = "token-2".to_string();
        let second = repo.upsert(second_payload).await.unwrap();

        let found = repo.find_active("u1", Marketplace::Ebay).unwrap().unwrap();
        assert_eq!(found.id, second.id);
        assert_eq!(found.access_token, "token-2");

        // The first row survives, deactivated.
        let mut conn = get_connection(&pool).unwrap();
        let rows: Vec<MarketplaceCredentialDB> = marketplace_credentials
            .select(MarketplaceCredentialDB::as_select())
            .load(&mut conn)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.iter().filter(|r| r.is_active).count(), 1);
        assert!(rows.iter().any(|r| r.id == first.id && !r.is_active));
    }

    #[tokio::test]
    async fn test_update_tokens_preserves_refresh_token_when_not_rotated() {
        let (_dir, pool, writer) = test_db::setup();
        let repo = CredentialRepository::new(pool, writer);

        let stored = repo.upsert(new_credential(Marketplace::Ebay)).await.unwrap();
        let new_expiry = Utc::now().naive_utc() + Duration::hours(4);
        repo.update_tokens(&stored.id, "token-next".to_string(), None, Some(new_expiry))
            .await
            .unwrap();

        let found = repo.find_active("u1", Marketplace::Ebay).unwrap().unwrap();
        assert_eq!(found.access_token, "token-next");
        assert_eq!(found.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(found.expires_at, Some(new_expiry));
    }

    #[tokio::test]
    async fn test_deactivate_and_list() {
        let (_dir, pool, writer) = test_db::setup();
        let repo = CredentialRepository::new(pool, writer);

        repo.upsert(new_credential(Marketplace::Ebay)).await.unwrap();
        repo.upsert(new_credential(Marketplace::Etsy)).await.unwrap();

        let mut connected = repo.list_active_marketplaces("u1").unwrap();
        connected.sort();
        assert_eq!(connected, vec![Marketplace::Ebay, Marketplace::Etsy]);

        repo.deactivate("u1", Marketplace::Ebay).await.unwrap();
        assert_eq!(
            repo.list_active_marketplaces("u1").unwrap(),
            vec![Marketplace::Etsy]
        );
        assert!(repo.find_active("u1", Marketplace::Ebay).unwrap().is_none());
    }
}
