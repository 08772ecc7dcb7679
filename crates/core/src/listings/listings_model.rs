//! Listing domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sellbridge_marketplace::{Marketplace, RemoteListingState};

/// The system's record of a product's presence on one marketplace.
///
/// At most one row per (product, marketplace) is ACTIVE at a time; a
/// relist transitions the existing row instead of creating a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub marketplace: Marketplace,
    pub marketplace_listing_id: String,
    pub status: ListingStatus,
    pub price: Decimal,
    pub quantity: i64,
    pub url: Option<String>,
    pub smart_relist: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Local listing lifecycle, tracking what the provider last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Active,
    Expired,
    Sold,
    Ended,
    Draft,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "ACTIVE",
            ListingStatus::Expired => "EXPIRED",
            ListingStatus::Sold => "SOLD",
            ListingStatus::Ended => "ENDED",
            ListingStatus::Draft => "DRAFT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "EXPIRED" => Some(Self::Expired),
            "SOLD" => Some(Self::Sold),
            "ENDED" => Some(Self::Ended),
            "DRAFT" => Some(Self::Draft),
            _ => None,
        }
    }
}

impl From<RemoteListingState> for ListingStatus {
    fn from(state: RemoteListingState) -> Self {
        match state {
            RemoteListingState::Active => ListingStatus::Active,
            RemoteListingState::Expired => ListingStatus::Expired,
            RemoteListingState::SoldOut => ListingStatus::Sold,
            RemoteListingState::Ended => ListingStatus::Ended,
            RemoteListingState::Draft => ListingStatus::Draft,
            // Providers report "inactive" for slots that are off-market
            // but reusable; locally that is an expired listing.
            RemoteListingState::Inactive | RemoteListingState::Unknown => ListingStatus::Expired,
        }
    }
}

/// Payload for creating or updating the row of a (product, marketplace)
/// pair after a successful publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpsert {
    pub user_id: String,
    pub product_id: String,
    pub marketplace: Marketplace,
    pub marketplace_listing_id: String,
    pub status: ListingStatus,
    pub price: Decimal,
    pub quantity: i64,
    pub url: Option<String>,
    pub smart_relist: bool,
}
