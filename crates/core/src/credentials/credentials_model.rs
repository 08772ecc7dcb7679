//! Credential domain models.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use sellbridge_marketplace::{ApiCredential, Marketplace};

/// A stored OAuth credential for one (user, marketplace) pair.
///
/// At most one row per pair is active at a time. Disconnecting flips
/// `is_active` to false; rows are never hard-deleted so token history
/// stays available for audit and debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceCredential {
    pub id: String,
    pub user_id: String,
    pub marketplace: Marketplace,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<NaiveDateTime>,
    pub shop_id: Option<String>,
    pub shop_name: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MarketplaceCredential {
    /// Returns true when the access token's expiry is known and has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|at| at <= Utc::now().naive_utc())
            .unwrap_or(false)
    }

    /// The provider-facing view of this credential.
    pub fn to_api_credential(&self) -> ApiCredential {
        ApiCredential {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            expires_at: self.expires_at.map(|at| at.and_utc()),
            shop_id: self.shop_id.clone(),
            shop_name: self.shop_name.clone(),
        }
    }
}

/// Payload for creating/replacing the active credential of a pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCredential {
    pub user_id: String,
    pub marketplace: Marketplace,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<NaiveDateTime>,
    pub shop_id: Option<String>,
    pub shop_name: Option<String>,
}

impl NewCredential {
    /// Builds the stored form of a credential returned by a provider.
    pub fn from_api(
        user_id: impl Into<String>,
        marketplace: Marketplace,
        credential: ApiCredential,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            marketplace,
            access_token: credential.access_token,
            refresh_token: credential.refresh_token,
            expires_at: credential.expires_at.map(|at| at.naive_utc()),
            shop_id: credential.shop_id,
            shop_name: credential.shop_name,
        }
    }
}
