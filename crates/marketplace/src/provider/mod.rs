//! Marketplace provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketplaceProvider` trait that all providers implement
//! - Concrete provider implementations (eBay, Etsy, Whatnot)
//!
//! # Architecture
//!
//! The provider system is designed to be:
//! - **Provider-agnostic**: callers are polymorphic over the trait and
//!   never branch on provider identity outside the registry
//! - **Extensible**: new marketplaces are added by implementing
//!   `MarketplaceProvider` and registering the instance
//! - **Resilient**: transient failures on idempotent calls are retried
//!   with exponential backoff; mutating calls are not blindly retried

mod traits;

// Provider implementations
pub mod ebay;
pub mod etsy;
pub mod whatnot;

// Re-exports
pub use traits::MarketplaceProvider;
