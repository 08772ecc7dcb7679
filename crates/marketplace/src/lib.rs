//! Sellbridge Marketplace Crate
//!
//! This crate provides provider-agnostic marketplace listing capabilities
//! for the Sellbridge application.
//!
//! # Overview
//!
//! The marketplace crate supports:
//! - Multiple selling platforms: eBay, Etsy (Whatnot is a declared stub)
//! - OAuth credential acquisition and refresh per provider
//! - A unified listing protocol over incompatible provider APIs
//! - Exponential-backoff retry for transient provider failures
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   Domain Layer   | --> |  ProductDetails  |  (unified product view)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     Registry     |  (marketplace -> provider)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     Provider     |  (eBay, Etsy, Whatnot)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  ListingResult   |  (normalized outcome)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`ProductDetails`] - Provider-agnostic product content
//! - [`ApiCredential`] - OAuth token pair with expiry and shop identifiers
//! - [`ListingResult`] - Normalized outcome of a create/update/relist
//! - [`RemoteListing`] - Provider-reported listing snapshot
//! - [`Marketplace`] - Supported marketplace identifiers

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;
pub mod retry;

// Re-export all public types from models
pub use models::{
    ApiCredential, Category, ListingAnalytics, ListingResult, ProductDetails, RemoteListing,
    RemoteListingState,
};

// Re-export provider types
pub use provider::ebay::{EbayConfig, EbayProvider};
pub use provider::etsy::{EtsyConfig, EtsyProvider};
pub use provider::whatnot::WhatnotProvider;
pub use provider::MarketplaceProvider;

// Re-export registry types
pub use registry::{Marketplace, ProviderRegistry};

// Re-export error and retry types
pub use errors::{MarketplaceError, RetryClass};
pub use retry::{with_retry, RetryOptions};
