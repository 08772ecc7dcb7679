//! OAuth credential model shared by all providers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An OAuth access/refresh token pair plus provider-specific identifiers.
///
/// Returned by `exchange_code` and `refresh`; passed back into every
/// provider call that talks to the marketplace on a user's behalf.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCredential {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// When the access token stops being accepted. Absent for providers
    /// that issue non-expiring tokens.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Provider-side shop/seller identifier (e.g. Etsy shop id).
    #[serde(default)]
    pub shop_id: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
}

impl ApiCredential {
    /// Returns true when `expires_at` is known and has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|at| at <= Utc::now()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn credential(expires_at: Option<DateTime<Utc>>) -> ApiCredential {
        ApiCredential {
            access_token: "token".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at,
            shop_id: None,
            shop_name: None,
        }
    }

    #[test]
    fn test_fresh_token_not_expired() {
        let cred = credential(Some(Utc::now() + Duration::hours(2)));
        assert!(!cred.is_expired());
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let cred = credential(Some(Utc::now() - Duration::minutes(5)));
        assert!(cred.is_expired());
    }

    #[test]
    fn test_missing_expiry_never_expires() {
        assert!(!credential(None).is_expired());
    }
}
