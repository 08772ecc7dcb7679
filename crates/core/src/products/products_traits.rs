//! Product reader trait.
//!
//! The product store belongs to the surrounding application; this core
//! receives products through an explicit read interface and never through
//! ambient shared state.

use async_trait::async_trait;

use super::Product;
use crate::errors::Result;

/// Read access to the product store.
#[async_trait]
pub trait ProductReaderTrait: Send + Sync {
    /// Looks up a product by id. Absent products are a normal outcome.
    async fn get_by_id(&self, product_id: &str) -> Result<Option<Product>>;
}
