//! Etsy marketplace provider implementation.
//!
//! Etsy charges a fee for every new listing, so this provider carries a
//! smart-relist policy: before creating, it scans the shop's inactive,
//! sold-out, and expired listings for one whose SKU matches the product
//! and reactivates that slot in place instead of paying for a fresh one.
//! Updates of existing listings go through the same in-place path.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::errors::MarketplaceError;
use crate::models::{
    ApiCredential, Category, ListingAnalytics, ListingResult, ProductDetails, RemoteListing,
    RemoteListingState,
};
use crate::provider::MarketplaceProvider;
use crate::retry::{with_retry, RetryOptions};

const PROVIDER_ID: &str = "ETSY";
const AUTH_URL: &str = "https://www.etsy.com/oauth/connect";
const TOKEN_URL: &str = "https://api.etsy.com/v3/public/oauth/token";
const API_BASE_URL: &str = "https://api.etsy.com/v3/application";
const OAUTH_SCOPES: &str = "listings_r listings_w shops_r";

/// States whose listing slots can be reused instead of paying for a new
/// listing.
const REUSABLE_STATES: &[&str] = &["inactive", "sold_out", "expired"];

/// Fee Etsy charges per new listing; what a smart relist saves.
const NEW_LISTING_FEE_CENTS: i64 = 20;

fn new_listing_fee() -> Decimal {
    Decimal::new(NEW_LISTING_FEE_CENTS, 2)
}

/// OAuth application credentials for the Etsy v3 API.
#[derive(Debug, Clone)]
pub struct EtsyConfig {
    /// The app keystring; doubles as the x-api-key header on every call.
    pub keystring: String,
    pub shared_secret: String,
    pub redirect_uri: String,
}

/// Etsy marketplace provider.
pub struct EtsyProvider {
    client: Client,
    config: EtsyConfig,
}

// ============================================================================
// Response structures for the Etsy v3 API
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    user_id: u64,
    #[serde(default)]
    shop_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ShopResponse {
    shop_id: u64,
    shop_name: String,
}

#[derive(Debug, Deserialize)]
struct ListingsResponse {
    #[serde(default)]
    results: Vec<EtsyListing>,
}

#[derive(Debug, Deserialize)]
struct EtsyListing {
    listing_id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    quantity: Option<i64>,
    #[serde(default)]
    price: Option<EtsyMoney>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    skus: Vec<String>,
    #[serde(default)]
    views: Option<u64>,
    #[serde(default)]
    num_favorers: Option<u64>,
}

/// Etsy encodes money as integer amount + divisor.
#[derive(Debug, Deserialize)]
struct EtsyMoney {
    amount: i64,
    divisor: i64,
}

impl EtsyMoney {
    fn to_decimal(&self) -> Option<Decimal> {
        if self.divisor <= 0 {
            return None;
        }
        Some(Decimal::from(self.amount) / Decimal::from(self.divisor))
    }
}

#[derive(Debug, Deserialize)]
struct ListingImagesResponse {
    #[serde(default)]
    results: Vec<ListingImage>,
}

#[derive(Debug, Deserialize)]
struct ListingImage {
    listing_image_id: u64,
}

#[derive(Debug, Deserialize)]
struct TaxonomyNodesResponse {
    #[serde(default)]
    results: Vec<TaxonomyNode>,
}

#[derive(Debug, Deserialize)]
struct TaxonomyNode {
    id: u64,
    name: String,
    #[serde(default)]
    children: Vec<TaxonomyNode>,
}

// ============================================================================
// EtsyProvider implementation
// ============================================================================

impl EtsyProvider {
    pub fn new(config: EtsyConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    fn headers(&self, credential: &ApiCredential) -> Result<HeaderMap, MarketplaceError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", credential.access_token))
            .map_err(|_| MarketplaceError::Authentication {
                provider: PROVIDER_ID.to_string(),
                message: "access token contains invalid characters".to_string(),
            })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.config.keystring).map_err(|_| {
                MarketplaceError::Provider {
                    provider: PROVIDER_ID.to_string(),
                    message: "invalid app keystring".to_string(),
                }
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn request_error(e: reqwest::Error) -> MarketplaceError {
        if e.is_timeout() {
            MarketplaceError::Timeout {
                provider: PROVIDER_ID.to_string(),
            }
        } else {
            MarketplaceError::Network(e)
        }
    }

    async fn api_call(
        &self,
        method: Method,
        path: &str,
        credential: &ApiCredential,
        body: Option<serde_json::Value>,
    ) -> Result<(StatusCode, String), MarketplaceError> {
        let url = format!("{}{}", API_BASE_URL, path);
        debug!("Etsy request: {} {}", method, path);

        let mut request = self
            .client
            .request(method, &url)
            .headers(self.headers(credential)?);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(Self::request_error)?;
        let status = response.status();
        let text = response.text().await.map_err(Self::request_error)?;

        if !status.is_success() {
            return Err(MarketplaceError::from_status(PROVIDER_ID, status, &text));
        }
        Ok((status, text))
    }

    fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, MarketplaceError> {
        serde_json::from_str(body).map_err(|e| MarketplaceError::Provider {
            provider: PROVIDER_ID.to_string(),
            message: format!("failed to parse response: {}", e),
        })
    }

    fn shop_id(credential: &ApiCredential) -> Result<&str, MarketplaceError> {
        credential
            .shop_id
            .as_deref()
            .ok_or_else(|| MarketplaceError::Authentication {
                provider: PROVIDER_ID.to_string(),
                message: "credential has no shop id; reconnect the Etsy account".to_string(),
            })
    }

    async fn token_request(
        &self,
        form: &[(&str, &str)],
        carry_refresh_token: Option<String>,
    ) -> Result<ApiCredential, MarketplaceError> {
        let response = self
            .client
            .post(TOKEN_URL)
            .form(form)
            .send()
            .await
            .map_err(Self::request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(Self::request_error)?;

        if !status.is_success() {
            return Err(MarketplaceError::Authentication {
                provider: PROVIDER_ID.to_string(),
                message: body,
            });
        }

        let token: TokenResponse = Self::parse_json(&body)?;
        Ok(ApiCredential {
            access_token: token.access_token,
            refresh_token: token.refresh_token.or(carry_refresh_token),
            expires_at: token
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
            shop_id: None,
            shop_name: None,
        })
    }

    /// Resolve the seller's shop for a fresh credential. Best-effort: a
    /// connected account without a shop still yields a usable credential.
    async fn attach_shop(&self, mut credential: ApiCredential) -> ApiCredential {
        let me: MeResponse = match self
            .api_call(Method::GET, "/users/me", &credential, None)
            .await
            .and_then(|(_, body)| Self::parse_json(&body))
        {
            Ok(me) => me,
            Err(e) => {
                warn!("Etsy shop lookup failed: {}", e);
                return credential;
            }
        };
        debug!("Etsy user {} connected", me.user_id);

        let Some(shop_id) = me.shop_id else {
            warn!("Etsy account has no shop; listings will be unavailable");
            return credential;
        };
        credential.shop_id = Some(shop_id.to_string());

        if let Ok(shop) = self
            .api_call(
                Method::GET,
                &format!("/shops/{}", shop_id),
                &credential,
                None,
            )
            .await
            .and_then(|(_, body)| Self::parse_json::<ShopResponse>(&body))
        {
            credential.shop_name = Some(shop.shop_name);
            credential.shop_id = Some(shop.shop_id.to_string());
        }

        credential
    }

    /// Scan the shop's reusable listings for a SKU match.
    async fn find_reusable_listing(
        &self,
        sku: &str,
        shop_id: &str,
        credential: &ApiCredential,
    ) -> Result<Option<EtsyListing>, MarketplaceError> {
        if sku.trim().is_empty() {
            // An empty SKU substring-matches every listing; never reuse
            // a slot on that basis.
            return Ok(None);
        }

        for state in REUSABLE_STATES {
            let path = format!(
                "/shops/{}/listings?state={}&limit=100",
                urlencoding::encode(shop_id),
                state
            );
            let path = path.as_str();
            let (_, body) = with_retry(RetryOptions::default(), move || async move {
                self.api_call(Method::GET, path, credential, None).await
            })
            .await?;
            let listings: ListingsResponse = Self::parse_json(&body)?;

            if let Some(hit) = select_relistable(listings.results, sku) {
                debug!(
                    "Reusing Etsy listing {} ({}) for SKU {}",
                    hit.listing_id, state, sku
                );
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }

    fn listing_content_payload(product: &ProductDetails) -> serde_json::Value {
        json!({
            "title": product.title,
            "description": product.description,
            "price": product.price.to_f64().unwrap_or(0.0),
            "quantity": product.quantity,
            "taxonomy_id": taxonomy_id(product),
            "tags": product.tags,
            "skus": [product.sku],
        })
    }

    /// Update a listing's content in place and make it active.
    ///
    /// The reactivation is the publish step and is safe to retry.
    async fn apply_listing_content(
        &self,
        listing_id: &str,
        product: &ProductDetails,
        shop_id: &str,
        credential: &ApiCredential,
    ) -> Result<EtsyListing, MarketplaceError> {
        let path = format!(
            "/shops/{}/listings/{}",
            urlencoding::encode(shop_id),
            urlencoding::encode(listing_id)
        );

        let mut payload = Self::listing_content_payload(product);
        payload["state"] = json!("active");

        let path = path.as_str();
        let payload = &payload;
        let updated: EtsyListing = with_retry(RetryOptions::default(), move || async move {
            let (_, body) = self
                .api_call(Method::PATCH, path, credential, Some(payload.clone()))
                .await?;
            Self::parse_json(&body)
        })
        .await?;

        self.replace_images(listing_id, &product.images, shop_id, credential)
            .await;

        Ok(updated)
    }

    /// Swap the listing's images for the product's current set.
    ///
    /// Image handling is best-effort: a failed upload degrades the listing
    /// but must not fail the relist that already went through.
    async fn replace_images(
        &self,
        listing_id: &str,
        images: &[String],
        shop_id: &str,
        credential: &ApiCredential,
    ) {
        let base = format!(
            "/shops/{}/listings/{}/images",
            urlencoding::encode(shop_id),
            urlencoding::encode(listing_id)
        );

        match self
            .api_call(Method::GET, &base, credential, None)
            .await
            .and_then(|(_, body)| Self::parse_json::<ListingImagesResponse>(&body))
        {
            Ok(existing) => {
                for image in existing.results {
                    let path = format!("{}/{}", base, image.listing_image_id);
                    if let Err(e) = self.api_call(Method::DELETE, &path, credential, None).await {
                        warn!(
                            "Failed to remove Etsy image {} from listing {}: {}",
                            image.listing_image_id, listing_id, e
                        );
                    }
                }
            }
            Err(e) => warn!("Could not list Etsy images for {}: {}", listing_id, e),
        }

        for url in images {
            if let Err(e) = self.upload_image(&base, url, credential).await {
                warn!("Failed to upload image {} to listing {}: {}", url, listing_id, e);
            }
        }
    }

    async fn upload_image(
        &self,
        images_path: &str,
        image_url: &str,
        credential: &ApiCredential,
    ) -> Result<(), MarketplaceError> {
        let bytes = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(Self::request_error)?
            .error_for_status()
            .map_err(Self::request_error)?
            .bytes()
            .await
            .map_err(Self::request_error)?;

        let part = reqwest::multipart::Part::bytes(bytes.to_vec()).file_name("image.jpg");
        let form = reqwest::multipart::Form::new().part("image", part);

        let mut headers = self.headers(credential)?;
        headers.remove(CONTENT_TYPE);

        let response = self
            .client
            .post(format!("{}{}", API_BASE_URL, images_path))
            .headers(headers)
            .multipart(form)
            .send()
            .await
            .map_err(Self::request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketplaceError::from_status(PROVIDER_ID, status, &body));
        }
        Ok(())
    }

    fn result_from_listing(listing: EtsyListing, relisted: bool) -> ListingResult {
        let listing_id = listing.listing_id.to_string();
        let url = listing
            .url
            .unwrap_or_else(|| format!("https://www.etsy.com/listing/{}", listing_id));
        ListingResult {
            listing_id,
            url: Some(url),
            state: map_listing_state(&listing.state),
            cost_saved: relisted.then(new_listing_fee),
            smart_relist: relisted,
        }
    }
}

#[async_trait]
impl MarketplaceProvider for EtsyProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Etsy"
    }

    fn auth_url(&self, state: &str) -> Result<String, MarketplaceError> {
        Ok(format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            AUTH_URL,
            urlencoding::encode(&self.config.keystring),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(OAUTH_SCOPES),
            urlencoding::encode(state),
        ))
    }

    async fn exchange_code(&self, code: &str) -> Result<ApiCredential, MarketplaceError> {
        let credential = self
            .token_request(
                &[
                    ("grant_type", "authorization_code"),
                    ("client_id", &self.config.keystring),
                    ("redirect_uri", &self.config.redirect_uri),
                    ("code", code),
                ],
                None,
            )
            .await?;
        Ok(self.attach_shop(credential).await)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ApiCredential, MarketplaceError> {
        self.token_request(
            &[
                ("grant_type", "refresh_token"),
                ("client_id", &self.config.keystring),
                ("refresh_token", refresh_token),
            ],
            Some(refresh_token.to_string()),
        )
        .await
    }

    async fn create_listing(
        &self,
        product: &ProductDetails,
        credential: &ApiCredential,
    ) -> Result<ListingResult, MarketplaceError> {
        product.validate()?;
        let shop_id = Self::shop_id(credential)?;

        // Smart relist: reuse an inactive slot before paying for a new one.
        if let Some(reusable) = self
            .find_reusable_listing(&product.sku, shop_id, credential)
            .await?
        {
            let listing_id = reusable.listing_id.to_string();
            let updated = self
                .apply_listing_content(&listing_id, product, shop_id, credential)
                .await?;
            return Ok(Self::result_from_listing(updated, true));
        }

        let path = format!("/shops/{}/listings", urlencoding::encode(shop_id));
        let mut payload = Self::listing_content_payload(product);
        payload["who_made"] = json!("someone_else");
        payload["when_made"] = json!("2020_2025");

        let (_, body) = self
            .api_call(Method::POST, &path, credential, Some(payload))
            .await?;
        let created: EtsyListing = Self::parse_json(&body)?;
        let listing_id = created.listing_id.to_string();

        // New listings start as drafts; the content pass uploads images
        // and flips the state to active, which is the publish step.
        let activated = self
            .apply_listing_content(&listing_id, product, shop_id, credential)
            .await?;

        Ok(Self::result_from_listing(activated, false))
    }

    async fn update_listing(
        &self,
        listing_id: &str,
        product: &ProductDetails,
        credential: &ApiCredential,
    ) -> Result<ListingResult, MarketplaceError> {
        product.validate()?;
        let shop_id = Self::shop_id(credential)?;

        // Update is the relist path: content in place, images replaced,
        // state forced back to active.
        let updated = self
            .apply_listing_content(listing_id, product, shop_id, credential)
            .await?;
        Ok(Self::result_from_listing(updated, false))
    }

    async fn delete_listing(
        &self,
        listing_id: &str,
        credential: &ApiCredential,
    ) -> Result<bool, MarketplaceError> {
        let path = format!("/listings/{}", urlencoding::encode(listing_id));
        match self.api_call(Method::DELETE, &path, credential, None).await {
            Ok(_) => Ok(true),
            Err(MarketplaceError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn get_listing(
        &self,
        listing_id: &str,
        credential: &ApiCredential,
    ) -> Result<Option<RemoteListing>, MarketplaceError> {
        let path = format!("/listings/{}", urlencoding::encode(listing_id));
        let path = path.as_str();
        let result = with_retry(RetryOptions::default(), move || async move {
            self.api_call(Method::GET, path, credential, None).await
        })
        .await;

        let body = match result {
            Ok((_, body)) => body,
            Err(MarketplaceError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let listing: EtsyListing = Self::parse_json(&body)?;
        Ok(Some(RemoteListing {
            listing_id: listing.listing_id.to_string(),
            title: listing.title,
            price: listing.price.as_ref().and_then(EtsyMoney::to_decimal),
            quantity: listing.quantity,
            state: map_listing_state(&listing.state),
            url: listing.url,
            sku: listing.skus.into_iter().next(),
        }))
    }

    async fn get_categories(
        &self,
        credential: &ApiCredential,
    ) -> Result<Vec<Category>, MarketplaceError> {
        let (_, body) = with_retry(RetryOptions::default(), move || async move {
            self.api_call(Method::GET, "/seller-taxonomy/nodes", credential, None)
                .await
        })
        .await?;

        let nodes: TaxonomyNodesResponse = Self::parse_json(&body)?;
        Ok(nodes
            .results
            .into_iter()
            .map(|n| Category {
                id: n.id.to_string(),
                name: n.name,
                path: None,
            })
            .collect())
    }

    async fn search_category(
        &self,
        query: &str,
        credential: &ApiCredential,
    ) -> Result<Vec<Category>, MarketplaceError> {
        let (_, body) = with_retry(RetryOptions::default(), move || async move {
            self.api_call(Method::GET, "/seller-taxonomy/nodes", credential, None)
                .await
        })
        .await?;

        // The taxonomy endpoint has no server-side search; filter the
        // flattened tree locally.
        let nodes: TaxonomyNodesResponse = Self::parse_json(&body)?;
        let mut flat = Vec::new();
        flatten_taxonomy(nodes.results, None, &mut flat);

        let needle = query.to_lowercase();
        Ok(flat
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect())
    }

    async fn update_inventory(
        &self,
        listing_id: &str,
        quantity: i64,
        credential: &ApiCredential,
    ) -> Result<bool, MarketplaceError> {
        let shop_id = Self::shop_id(credential)?;
        let path = format!(
            "/shops/{}/listings/{}",
            urlencoding::encode(shop_id),
            urlencoding::encode(listing_id)
        );
        self.api_call(
            Method::PATCH,
            &path,
            credential,
            Some(json!({ "quantity": quantity })),
        )
        .await?;
        Ok(true)
    }

    async fn get_listing_analytics(
        &self,
        listing_id: &str,
        credential: &ApiCredential,
    ) -> ListingAnalytics {
        // Views and favorites ride on the listing resource itself.
        let path = format!("/listings/{}", urlencoding::encode(listing_id));
        let listing = self
            .api_call(Method::GET, &path, credential, None)
            .await
            .and_then(|(_, body)| Self::parse_json::<EtsyListing>(&body));

        match listing {
            Ok(listing) => ListingAnalytics {
                views: listing.views,
                watchers: None,
                favorites: listing.num_favorers,
            },
            Err(e) => {
                warn!("Etsy analytics unavailable for {}: {}", listing_id, e);
                ListingAnalytics::default()
            }
        }
    }
}

/// Pick the first reusable listing whose SKU contains the product's SKU.
///
/// Matching is permissive substring containment, preserved from the
/// legacy behavior; a short product SKU can match an unrelated listing.
fn select_relistable(listings: Vec<EtsyListing>, sku: &str) -> Option<EtsyListing> {
    listings
        .into_iter()
        .find(|listing| listing.skus.iter().any(|s| s.contains(sku)))
}

fn taxonomy_id(product: &ProductDetails) -> u64 {
    product
        .attribute_str("etsy_taxonomy_id")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1)
}

fn map_listing_state(state: &str) -> RemoteListingState {
    match state {
        "active" => RemoteListingState::Active,
        "inactive" => RemoteListingState::Inactive,
        "sold_out" => RemoteListingState::SoldOut,
        "expired" => RemoteListingState::Expired,
        "draft" | "edit" => RemoteListingState::Draft,
        "removed" => RemoteListingState::Ended,
        _ => RemoteListingState::Unknown,
    }
}

fn flatten_taxonomy(nodes: Vec<TaxonomyNode>, parent: Option<&str>, out: &mut Vec<Category>) {
    for node in nodes {
        let path = match parent {
            Some(parent) => format!("{} > {}", parent, node.name),
            None => node.name.clone(),
        };
        out.push(Category {
            id: node.id.to_string(),
            name: node.name.clone(),
            path: Some(path.clone()),
        });
        flatten_taxonomy(node.children, Some(&path), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn provider() -> EtsyProvider {
        EtsyProvider::new(EtsyConfig {
            keystring: "etsy-key".to_string(),
            shared_secret: "etsy-secret".to_string(),
            redirect_uri: "https://sellbridge.example.com/oauth/etsy".to_string(),
        })
    }

    fn listing(id: u64, skus: &[&str]) -> EtsyListing {
        EtsyListing {
            listing_id: id,
            title: format!("Listing {}", id),
            state: "inactive".to_string(),
            quantity: Some(0),
            price: None,
            url: None,
            skus: skus.iter().map(|s| s.to_string()).collect(),
            views: None,
            num_favorers: None,
        }
    }

    fn product() -> ProductDetails {
        ProductDetails {
            title: "Hand-thrown mug".to_string(),
            description: "Stoneware mug, 350ml.".to_string(),
            price: dec!(24.00),
            quantity: 4,
            images: vec!["https://img.example.com/mug.jpg".to_string()],
            sku: "MUG-350".to_string(),
            brand: None,
            condition: None,
            tags: vec!["ceramics".to_string()],
            attributes: HashMap::new(),
        }
    }

    #[test]
    fn test_auth_url_embeds_state_verbatim() {
        let url = provider().auth_url("csrf-token-9").unwrap();
        assert!(url.starts_with("https://www.etsy.com/oauth/connect?"));
        assert!(url.contains("state=csrf-token-9"));
        assert!(url.contains("client_id=etsy-key"));
    }

    #[test]
    fn test_select_relistable_matches_substring() {
        let listings = vec![
            listing(1, &["OTHER-SKU"]),
            listing(2, &["BOX-MUG-350-V2"]),
            listing(3, &["MUG-350"]),
        ];
        // Permissive containment: the first containing match wins, even
        // though listing 3 is the exact one.
        let hit = select_relistable(listings, "MUG-350").unwrap();
        assert_eq!(hit.listing_id, 2);
    }

    #[test]
    fn test_select_relistable_no_match() {
        let listings = vec![listing(1, &["A"]), listing(2, &[])];
        assert!(select_relistable(listings, "MUG-350").is_none());
    }

    #[test]
    fn test_new_listing_fee_is_twenty_cents() {
        assert_eq!(new_listing_fee(), dec!(0.20));
    }

    #[test]
    fn test_result_from_relisted_listing_carries_saving() {
        let mut l = listing(42, &["MUG-350"]);
        l.state = "active".to_string();
        let result = EtsyProvider::result_from_listing(l, true);
        assert!(result.smart_relist);
        assert_eq!(result.cost_saved, Some(dec!(0.20)));
        assert_eq!(result.listing_id, "42");
        assert_eq!(
            result.url.as_deref(),
            Some("https://www.etsy.com/listing/42")
        );
    }

    #[test]
    fn test_result_from_created_listing_has_no_saving() {
        let mut l = listing(7, &[]);
        l.state = "active".to_string();
        let result = EtsyProvider::result_from_listing(l, false);
        assert!(!result.smart_relist);
        assert_eq!(result.cost_saved, None);
    }

    #[test]
    fn test_listing_state_mapping() {
        assert_eq!(map_listing_state("active"), RemoteListingState::Active);
        assert_eq!(map_listing_state("sold_out"), RemoteListingState::SoldOut);
        assert_eq!(map_listing_state("expired"), RemoteListingState::Expired);
        assert_eq!(map_listing_state("draft"), RemoteListingState::Draft);
        assert_eq!(map_listing_state("removed"), RemoteListingState::Ended);
        assert_eq!(map_listing_state("???"), RemoteListingState::Unknown);
    }

    #[test]
    fn test_content_payload_shape() {
        let payload = EtsyProvider::listing_content_payload(&product());
        assert_eq!(payload["title"], "Hand-thrown mug");
        assert_eq!(payload["quantity"], 4);
        assert_eq!(payload["skus"][0], "MUG-350");
        assert_eq!(payload["taxonomy_id"], 1);
    }

    #[test]
    fn test_money_conversion() {
        let money = EtsyMoney {
            amount: 2400,
            divisor: 100,
        };
        assert_eq!(money.to_decimal(), Some(dec!(24)));

        let broken = EtsyMoney {
            amount: 2400,
            divisor: 0,
        };
        assert_eq!(broken.to_decimal(), None);
    }

    #[test]
    fn test_missing_shop_id_is_auth_error() {
        let credential = ApiCredential {
            access_token: "t".to_string(),
            refresh_token: None,
            expires_at: None,
            shop_id: None,
            shop_name: None,
        };
        let err = EtsyProvider::shop_id(&credential).unwrap_err();
        assert!(matches!(err, MarketplaceError::Authentication { .. }));
    }
}
