//! Products module - the read-only boundary to the product store.

mod products_model;
mod products_traits;

pub use products_model::Product;
pub use products_traits::ProductReaderTrait;
