//! eBay marketplace provider implementation.
//!
//! Listings go through the eBay Sell Inventory API, which splits a listing
//! into three resources:
//! - an inventory item, keyed by SKU (product content + availability)
//! - an offer, which binds the SKU to a marketplace, price, and policies
//! - a publish call that turns the offer into a live listing
//!
//! The offer id is what we store as the marketplace listing id; the
//! published eBay listing id only appears in the public URL.

use async_trait::async_trait;
use base64::Engine;
use chrono::{Duration, Utc};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
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

const PROVIDER_ID: &str = "EBAY";
const AUTH_URL: &str = "https://auth.ebay.com/oauth2/authorize";
const TOKEN_URL: &str = "https://api.ebay.com/identity/v1/oauth2/token";
const API_BASE_URL: &str = "https://api.ebay.com";
const MARKETPLACE_ID: &str = "EBAY_US";
const CURRENCY: &str = "USD";
const OAUTH_SCOPES: &str = "https://api.ebay.com/oauth/api_scope/sell.inventory \
     https://api.ebay.com/oauth/api_scope/sell.account \
     https://api.ebay.com/oauth/api_scope/sell.analytics.readonly";

/// Fallback leaf category when the product carries no category hint.
const DEFAULT_CATEGORY_ID: &str = "175672";

/// OAuth application credentials plus the seller's business policy ids.
#[derive(Debug, Clone)]
pub struct EbayConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub fulfillment_policy_id: Option<String>,
    pub payment_policy_id: Option<String>,
    pub return_policy_id: Option<String>,
    pub merchant_location_key: Option<String>,
}

/// eBay marketplace provider.
pub struct EbayProvider {
    client: Client,
    config: EbayConfig,
}

// ============================================================================
// Response structures for the eBay APIs
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Seconds until the access token expires.
    expires_in: Option<i64>,
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateOfferResponse {
    #[serde(rename = "offerId")]
    offer_id: String,
}

#[derive(Debug, Deserialize)]
struct PublishOfferResponse {
    #[serde(rename = "listingId")]
    listing_id: String,
}

#[derive(Debug, Deserialize)]
struct OfferResponse {
    #[serde(rename = "offerId")]
    offer_id: String,
    sku: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, rename = "pricingSummary")]
    pricing_summary: Option<PricingSummary>,
    #[serde(default, rename = "availableQuantity")]
    available_quantity: Option<i64>,
    #[serde(default)]
    listing: Option<OfferListingRef>,
}

#[derive(Debug, Deserialize)]
struct PricingSummary {
    #[serde(default)]
    price: Option<Amount>,
}

#[derive(Debug, Deserialize)]
struct Amount {
    value: String,
}

#[derive(Debug, Deserialize)]
struct OfferListingRef {
    #[serde(rename = "listingId")]
    listing_id: String,
}

#[derive(Debug, Deserialize)]
struct CategoryTreeResponse {
    #[serde(rename = "rootCategoryNode")]
    root: CategoryNode,
}

#[derive(Debug, Deserialize)]
struct CategoryNode {
    category: CategoryRef,
    #[serde(default, rename = "childCategoryTreeNodes")]
    children: Vec<CategoryNode>,
}

#[derive(Debug, Deserialize)]
struct CategoryRef {
    #[serde(rename = "categoryId")]
    category_id: String,
    #[serde(rename = "categoryName")]
    category_name: String,
}

#[derive(Debug, Deserialize)]
struct CategorySuggestionResponse {
    #[serde(default, rename = "categorySuggestions")]
    suggestions: Vec<CategorySuggestion>,
}

#[derive(Debug, Deserialize)]
struct CategorySuggestion {
    category: CategoryRef,
    #[serde(default, rename = "categoryTreeNodeAncestors")]
    ancestors: Vec<CategoryAncestor>,
}

#[derive(Debug, Deserialize)]
struct CategoryAncestor {
    #[serde(rename = "categoryName")]
    category_name: String,
}

#[derive(Debug, Deserialize)]
struct TrafficReportResponse {
    #[serde(default)]
    records: Vec<TrafficRecord>,
}

#[derive(Debug, Deserialize)]
struct TrafficRecord {
    #[serde(default, rename = "metricValues")]
    metric_values: Vec<MetricValue>,
}

#[derive(Debug, Deserialize)]
struct MetricValue {
    #[serde(default)]
    value: Option<serde_json::Value>,
}

// ============================================================================
// EbayProvider implementation
// ============================================================================

impl EbayProvider {
    pub fn new(config: EbayConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    fn basic_auth(&self) -> String {
        let raw = format!("{}:{}", self.config.client_id, self.config.client_secret);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }

    fn bearer_headers(credential: &ApiCredential) -> Result<HeaderMap, MarketplaceError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", credential.access_token)).map_err(
            |_| MarketplaceError::Authentication {
                provider: PROVIDER_ID.to_string(),
                message: "access token contains invalid characters".to_string(),
            },
        )?;
        headers.insert(AUTHORIZATION, value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "Content-Language",
            HeaderValue::from_static("en-US"),
        );
        Ok(headers)
    }

    /// POST to the token endpoint with the given form body and parse the
    /// credential out of the response.
    async fn token_request(
        &self,
        form: &[(&str, &str)],
        carry_refresh_token: Option<String>,
    ) -> Result<ApiCredential, MarketplaceError> {
        let response = self
            .client
            .post(TOKEN_URL)
            .header(AUTHORIZATION, self.basic_auth())
            .form(form)
            .send()
            .await
            .map_err(Self::request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(Self::request_error)?;

        if !status.is_success() {
            // Token endpoint failures are authentication failures even when
            // the status is a generic 400 (invalid_grant and friends).
            if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
                return Err(MarketplaceError::Authentication {
                    provider: PROVIDER_ID.to_string(),
                    message: body,
                });
            }
            return Err(MarketplaceError::from_status(PROVIDER_ID, status, &body));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| MarketplaceError::Provider {
                provider: PROVIDER_ID.to_string(),
                message: format!("failed to parse token response: {}", e),
            })?;

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

    fn request_error(e: reqwest::Error) -> MarketplaceError {
        if e.is_timeout() {
            MarketplaceError::Timeout {
                provider: PROVIDER_ID.to_string(),
            }
        } else {
            MarketplaceError::Network(e)
        }
    }

    /// Issue an authenticated API call and return the response body on 2xx.
    async fn api_call(
        &self,
        method: Method,
        path: &str,
        credential: &ApiCredential,
        body: Option<serde_json::Value>,
    ) -> Result<(StatusCode, String), MarketplaceError> {
        let url = format!("{}{}", API_BASE_URL, path);
        debug!("eBay request: {} {}", method, path);

        let mut request = self
            .client
            .request(method, &url)
            .headers(Self::bearer_headers(credential)?);
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

    fn inventory_item_payload(product: &ProductDetails) -> serde_json::Value {
        json!({
            "availability": {
                "shipToLocationAvailability": { "quantity": product.quantity }
            },
            "condition": map_condition(product.condition.as_deref()),
            "product": {
                "title": product.title,
                "description": product.description,
                "imageUrls": product.images,
                "brand": product.brand,
                "mpn": product.sku,
                "aspects": aspects_from_tags(&product.tags),
            }
        })
    }

    fn offer_payload(&self, product: &ProductDetails) -> serde_json::Value {
        let mut listing_policies = serde_json::Map::new();
        if let Some(id) = &self.config.fulfillment_policy_id {
            listing_policies.insert("fulfillmentPolicyId".to_string(), json!(id));
        }
        if let Some(id) = &self.config.payment_policy_id {
            listing_policies.insert("paymentPolicyId".to_string(), json!(id));
        }
        if let Some(id) = &self.config.return_policy_id {
            listing_policies.insert("returnPolicyId".to_string(), json!(id));
        }

        let category_id = product
            .attribute_str("ebay_category_id")
            .unwrap_or(DEFAULT_CATEGORY_ID);

        json!({
            "sku": product.sku,
            "marketplaceId": MARKETPLACE_ID,
            "format": "FIXED_PRICE",
            "availableQuantity": product.quantity,
            "categoryId": category_id,
            "listingDescription": product.description,
            "merchantLocationKey": self.config.merchant_location_key,
            "pricingSummary": {
                "price": { "value": product.price.to_string(), "currency": CURRENCY }
            },
            "listingPolicies": listing_policies,
        })
    }

    /// Put the inventory item for this SKU, creating or replacing it.
    async fn put_inventory_item(
        &self,
        product: &ProductDetails,
        credential: &ApiCredential,
    ) -> Result<(), MarketplaceError> {
        let path = format!(
            "/sell/inventory/v1/inventory_item/{}",
            urlencoding::encode(&product.sku)
        );
        self.api_call(
            Method::PUT,
            &path,
            credential,
            Some(Self::inventory_item_payload(product)),
        )
        .await?;
        Ok(())
    }

    async fn fetch_offer(
        &self,
        offer_id: &str,
        credential: &ApiCredential,
    ) -> Result<OfferResponse, MarketplaceError> {
        let path = format!("/sell/inventory/v1/offer/{}", urlencoding::encode(offer_id));
        let (_, body) = self.api_call(Method::GET, &path, credential, None).await?;
        Self::parse_json(&body)
    }
}

#[async_trait]
impl MarketplaceProvider for EbayProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "eBay"
    }

    fn auth_url(&self, state: &str) -> Result<String, MarketplaceError> {
        Ok(format!(
            "{}?client_id={}&response_type=code&redirect_uri={}&scope={}&state={}",
            AUTH_URL,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(OAUTH_SCOPES),
            urlencoding::encode(state),
        ))
    }

    async fn exchange_code(&self, code: &str) -> Result<ApiCredential, MarketplaceError> {
        self.token_request(
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.config.redirect_uri),
            ],
            None,
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ApiCredential, MarketplaceError> {
        // eBay does not rotate the refresh token on refresh; carry the
        // old one forward so the credential stays complete.
        self.token_request(
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("scope", OAUTH_SCOPES),
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

        self.put_inventory_item(product, credential).await?;

        let (_, body) = self
            .api_call(
                Method::POST,
                "/sell/inventory/v1/offer",
                credential,
                Some(self.offer_payload(product)),
            )
            .await?;
        let offer: CreateOfferResponse = Self::parse_json(&body)?;

        // Publishing is safe to retry: re-publishing an already-published
        // offer is rejected by eBay without creating a duplicate listing.
        let publish_path = format!(
            "/sell/inventory/v1/offer/{}/publish",
            urlencoding::encode(&offer.offer_id)
        );
        let publish_path = publish_path.as_str();
        let published: PublishOfferResponse = with_retry(RetryOptions::default(), move || async move {
            let (_, body) = self
                .api_call(Method::POST, publish_path, credential, None)
                .await?;
            Self::parse_json(&body)
        })
        .await?;

        Ok(ListingResult {
            listing_id: offer.offer_id,
            url: Some(format!("https://www.ebay.com/itm/{}", published.listing_id)),
            state: RemoteListingState::Active,
            cost_saved: None,
            smart_relist: false,
        })
    }

    async fn update_listing(
        &self,
        listing_id: &str,
        product: &ProductDetails,
        credential: &ApiCredential,
    ) -> Result<ListingResult, MarketplaceError> {
        product.validate()?;

        // The inventory item is keyed by SKU; refresh content first, then
        // bring the offer's price/quantity in line.
        self.put_inventory_item(product, credential).await?;

        let path = format!(
            "/sell/inventory/v1/offer/{}",
            urlencoding::encode(listing_id)
        );
        self.api_call(
            Method::PUT,
            &path,
            credential,
            Some(self.offer_payload(product)),
        )
        .await?;

        let offer = self.fetch_offer(listing_id, credential).await?;
        let url = offer
            .listing
            .map(|l| format!("https://www.ebay.com/itm/{}", l.listing_id));

        Ok(ListingResult {
            listing_id: listing_id.to_string(),
            url,
            state: map_offer_status(offer.status.as_deref()),
            cost_saved: None,
            smart_relist: false,
        })
    }

    async fn delete_listing(
        &self,
        listing_id: &str,
        credential: &ApiCredential,
    ) -> Result<bool, MarketplaceError> {
        let path = format!(
            "/sell/inventory/v1/offer/{}",
            urlencoding::encode(listing_id)
        );
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
        let result = with_retry(RetryOptions::default(), move || async move {
            self.fetch_offer(listing_id, credential).await
        })
        .await;

        let offer = match result {
            Ok(offer) => offer,
            Err(MarketplaceError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let price = offer
            .pricing_summary
            .and_then(|p| p.price)
            .and_then(|a| a.value.parse::<Decimal>().ok());

        Ok(Some(RemoteListing {
            listing_id: offer.offer_id,
            title: String::new(),
            price,
            quantity: offer.available_quantity,
            state: map_offer_status(offer.status.as_deref()),
            url: offer
                .listing
                .map(|l| format!("https://www.ebay.com/itm/{}", l.listing_id)),
            sku: Some(offer.sku),
        }))
    }

    async fn get_categories(
        &self,
        credential: &ApiCredential,
    ) -> Result<Vec<Category>, MarketplaceError> {
        let (_, body) = with_retry(RetryOptions::default(), move || async move {
            self.api_call(
                Method::GET,
                "/commerce/taxonomy/v1/category_tree/0",
                credential,
                None,
            )
            .await
        })
        .await?;

        let tree: CategoryTreeResponse = Self::parse_json(&body)?;
        Ok(tree
            .root
            .children
            .into_iter()
            .map(|node| Category {
                id: node.category.category_id,
                name: node.category.category_name,
                path: None,
            })
            .collect())
    }

    async fn search_category(
        &self,
        query: &str,
        credential: &ApiCredential,
    ) -> Result<Vec<Category>, MarketplaceError> {
        let path = format!(
            "/commerce/taxonomy/v1/category_tree/0/get_category_suggestions?q={}",
            urlencoding::encode(query)
        );
        let path = path.as_str();
        let (_, body) = with_retry(RetryOptions::default(), move || async move {
            self.api_call(Method::GET, path, credential, None).await
        })
        .await?;

        let response: CategorySuggestionResponse = Self::parse_json(&body)?;
        Ok(response
            .suggestions
            .into_iter()
            .map(|s| {
                let path = if s.ancestors.is_empty() {
                    None
                } else {
                    Some(
                        s.ancestors
                            .iter()
                            .rev()
                            .map(|a| a.category_name.as_str())
                            .collect::<Vec<_>>()
                            .join(" > "),
                    )
                };
                Category {
                    id: s.category.category_id,
                    name: s.category.category_name,
                    path,
                }
            })
            .collect())
    }

    async fn update_inventory(
        &self,
        listing_id: &str,
        quantity: i64,
        credential: &ApiCredential,
    ) -> Result<bool, MarketplaceError> {
        // Quantity lives on the inventory item, keyed by SKU; resolve the
        // SKU through the offer first.
        let offer = self.fetch_offer(listing_id, credential).await?;

        let payload = json!({
            "requests": [{
                "sku": offer.sku,
                "shipToLocationAvailability": { "quantity": quantity }
            }]
        });
        self.api_call(
            Method::POST,
            "/sell/inventory/v1/bulk_update_price_quantity",
            credential,
            Some(payload),
        )
        .await?;
        Ok(true)
    }

    async fn get_listing_analytics(
        &self,
        listing_id: &str,
        credential: &ApiCredential,
    ) -> ListingAnalytics {
        let path = format!(
            "/sell/analytics/v1/traffic_report?dimension=LISTING\
             &filter=listing_ids:%7B{}%7D\
             &metric=LISTING_IMPRESSION_TOTAL,LISTING_VIEWS_TOTAL",
            urlencoding::encode(listing_id)
        );

        let body = match self.api_call(Method::GET, &path, credential, None).await {
            Ok((_, body)) => body,
            Err(e) => {
                warn!("eBay traffic report unavailable for {}: {}", listing_id, e);
                return ListingAnalytics::default();
            }
        };

        let report: TrafficReportResponse = match Self::parse_json(&body) {
            Ok(r) => r,
            Err(_) => return ListingAnalytics::default(),
        };

        let mut metrics = report
            .records
            .into_iter()
            .next()
            .map(|r| r.metric_values)
            .unwrap_or_default()
            .into_iter();

        let impressions = metrics.next().and_then(|m| as_u64(m.value));
        let views = metrics.next().and_then(|m| as_u64(m.value));

        ListingAnalytics {
            views: views.or(impressions),
            watchers: None,
            favorites: None,
        }
    }
}

fn as_u64(value: Option<serde_json::Value>) -> Option<u64> {
    match value? {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Map the product's free-form condition onto eBay's condition enum.
fn map_condition(condition: Option<&str>) -> &'static str {
    match condition.map(|c| c.to_ascii_uppercase()).as_deref() {
        Some("NEW") => "NEW",
        Some("LIKE_NEW") | Some("OPEN_BOX") => "LIKE_NEW",
        Some("USED_EXCELLENT") => "USED_EXCELLENT",
        Some("USED_GOOD") | Some("USED") => "USED_GOOD",
        Some("USED_ACCEPTABLE") | Some("FAIR") => "USED_ACCEPTABLE",
        Some("FOR_PARTS") | Some("NOT_WORKING") => "FOR_PARTS_OR_NOT_WORKING",
        _ => "USED_GOOD",
    }
}

fn map_offer_status(status: Option<&str>) -> RemoteListingState {
    match status {
        Some("PUBLISHED") => RemoteListingState::Active,
        Some("UNPUBLISHED") => RemoteListingState::Inactive,
        Some("ENDED") => RemoteListingState::Ended,
        _ => RemoteListingState::Unknown,
    }
}

/// eBay item aspects are name -> list-of-values; tags become a single
/// "Features" aspect rather than inventing per-tag aspect names.
fn aspects_from_tags(tags: &[String]) -> serde_json::Value {
    if tags.is_empty() {
        json!({})
    } else {
        json!({ "Features": tags })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn provider() -> EbayProvider {
        EbayProvider::new(EbayConfig {
            client_id: "app-id".to_string(),
            client_secret: "app-secret".to_string(),
            redirect_uri: "https://sellbridge.example.com/oauth/ebay".to_string(),
            fulfillment_policy_id: Some("FULFILL-1".to_string()),
            payment_policy_id: None,
            return_policy_id: None,
            merchant_location_key: Some("WAREHOUSE-1".to_string()),
        })
    }

    fn product() -> ProductDetails {
        ProductDetails {
            title: "Mechanical keyboard".to_string(),
            description: "Tenkeyless, brown switches.".to_string(),
            price: dec!(89.00),
            quantity: 3,
            images: vec!["https://img.example.com/kb.jpg".to_string()],
            sku: "KB-TKL-01".to_string(),
            brand: Some("Keychron".to_string()),
            condition: Some("used".to_string()),
            tags: vec!["keyboard".to_string()],
            attributes: HashMap::new(),
        }
    }

    #[test]
    fn test_auth_url_embeds_state_verbatim() {
        let url = provider().auth_url("opaque-state-123").unwrap();
        assert!(url.starts_with("https://auth.ebay.com/oauth2/authorize?"));
        assert!(url.contains("state=opaque-state-123"));
        assert!(url.contains("client_id=app-id"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn test_condition_mapping() {
        assert_eq!(map_condition(Some("new")), "NEW");
        assert_eq!(map_condition(Some("USED")), "USED_GOOD");
        assert_eq!(map_condition(Some("for_parts")), "FOR_PARTS_OR_NOT_WORKING");
        assert_eq!(map_condition(None), "USED_GOOD");
        assert_eq!(map_condition(Some("something-else")), "USED_GOOD");
    }

    #[test]
    fn test_offer_status_mapping() {
        assert_eq!(
            map_offer_status(Some("PUBLISHED")),
            RemoteListingState::Active
        );
        assert_eq!(
            map_offer_status(Some("UNPUBLISHED")),
            RemoteListingState::Inactive
        );
        assert_eq!(map_offer_status(Some("ENDED")), RemoteListingState::Ended);
        assert_eq!(map_offer_status(None), RemoteListingState::Unknown);
    }

    #[test]
    fn test_inventory_item_payload_shape() {
        let payload = EbayProvider::inventory_item_payload(&product());
        assert_eq!(
            payload["availability"]["shipToLocationAvailability"]["quantity"],
            3
        );
        assert_eq!(payload["condition"], "USED_GOOD");
        assert_eq!(payload["product"]["title"], "Mechanical keyboard");
        assert_eq!(payload["product"]["mpn"], "KB-TKL-01");
    }

    #[test]
    fn test_offer_payload_includes_configured_policies() {
        let payload = provider().offer_payload(&product());
        assert_eq!(payload["sku"], "KB-TKL-01");
        assert_eq!(payload["marketplaceId"], "EBAY_US");
        assert_eq!(payload["format"], "FIXED_PRICE");
        assert_eq!(payload["pricingSummary"]["price"]["value"], "89.00");
        assert_eq!(
            payload["listingPolicies"]["fulfillmentPolicyId"],
            "FULFILL-1"
        );
        assert!(payload["listingPolicies"]
            .get("paymentPolicyId")
            .is_none());
    }

    #[test]
    fn test_offer_payload_uses_category_hint() {
        let mut p = product();
        p.attributes.insert(
            "ebay_category_id".to_string(),
            serde_json::Value::String("33963".to_string()),
        );
        let payload = provider().offer_payload(&p);
        assert_eq!(payload["categoryId"], "33963");

        let fallback = provider().offer_payload(&product());
        assert_eq!(fallback["categoryId"], DEFAULT_CATEGORY_ID);
    }
}
