//! Environment-driven server configuration.
//!
//! Provider OAuth apps are optional: a marketplace without configured
//! credentials simply doesn't register in the provider registry, and the
//! server keeps running with whatever is configured.

use sellbridge_marketplace::{EbayConfig, EtsyConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub db_path: String,
    pub ebay: Option<EbayConfig>,
    pub etsy: Option<EtsyConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        // Missing .env is fine; real deployments use process env vars.
        let _ = dotenvy::dotenv();

        Self {
            listen_addr: env_or("SB_LISTEN_ADDR", "0.0.0.0:8780"),
            db_path: env_or("SB_DB_PATH", "data/sellbridge.db"),
            ebay: ebay_from_env(),
            etsy: etsy_from_env(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn ebay_from_env() -> Option<EbayConfig> {
    Some(EbayConfig {
        client_id: env_opt("EBAY_CLIENT_ID")?,
        client_secret: env_opt("EBAY_CLIENT_SECRET")?,
        redirect_uri: env_opt("EBAY_REDIRECT_URI")?,
        fulfillment_policy_id: env_opt("EBAY_FULFILLMENT_POLICY_ID"),
        payment_policy_id: env_opt("EBAY_PAYMENT_POLICY_ID"),
        return_policy_id: env_opt("EBAY_RETURN_POLICY_ID"),
        merchant_location_key: env_opt("EBAY_MERCHANT_LOCATION_KEY"),
    })
}

fn etsy_from_env() -> Option<EtsyConfig> {
    Some(EtsyConfig {
        keystring: env_opt("ETSY_KEYSTRING")?,
        shared_secret: env_opt("ETSY_SHARED_SECRET")?,
        redirect_uri: env_opt("ETSY_REDIRECT_URI")?,
    })
}
