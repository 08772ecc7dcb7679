//! Listing storage.

mod model;
mod repository;

pub use model::ListingDB;
pub use repository::ListingRepository;
