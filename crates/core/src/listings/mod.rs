//! Listings module - local records of products published to marketplaces.

mod listings_model;
mod listings_service;
mod listings_traits;

pub use listings_model::{Listing, ListingStatus, ListingUpsert};
pub use listings_service::ListingService;
pub use listings_traits::ListingRepositoryTrait;
