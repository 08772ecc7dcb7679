//! Database model for marketplace credentials.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::errors::StorageError;
use sellbridge_core::credentials::{MarketplaceCredential, NewCredential};
use sellbridge_core::errors::Error;
use sellbridge_marketplace::Marketplace;

/// Database model for marketplace credentials
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::marketplace_credentials)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MarketplaceCredentialDB {
    pub id: String,
    pub user_id: String,
    pub marketplace: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<NaiveDateTime>,
    pub shop_id: Option<String>,
    pub shop_name: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<MarketplaceCredentialDB> for MarketplaceCredential {
    type Error = Error;

    fn try_from(db: MarketplaceCredentialDB) -> Result<Self, Error> {
        let marketplace = Marketplace::from_str(&db.marketplace).map_err(|_| {
            StorageError::CorruptRow(format!(
                "credential {} has unknown marketplace '{}'",
                db.id, db.marketplace
            ))
        })?;
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            marketplace,
            access_token: db.access_token,
            refresh_token: db.refresh_token,
            expires_at: db.expires_at,
            shop_id: db.shop_id,
            shop_name: db.shop_name,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<NewCredential> for MarketplaceCredentialDB {
    fn from(domain: NewCredential) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: domain.user_id,
            marketplace: domain.marketplace.as_str().to_string(),
            access_token: domain.access_token,
            refresh_token: domain.refresh_token,
            expires_at: domain.expires_at,
            shop_id: domain.shop_id,
            shop_name: domain.shop_name,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
