//! Diesel-backed read access to the product table.
//!
//! The product table is owned by the surrounding application; this
//! repository only implements the read interface the cross-listing core
//! depends on. `seed` exists for tests and dev fixtures.

use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::DieselErrorExt;
use crate::schema::products;
use crate::schema::products::dsl::*;

use super::model::ProductDB;
use sellbridge_core::errors::Result;
use sellbridge_core::products::{Product, ProductReaderTrait};

/// Read-only repository over the products table.
pub struct ProductRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProductRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Inserts a fixture row. Test/dev support only; the core never
    /// creates products.
    pub async fn seed(&self, row: ProductDB) -> Result<()> {
        self.writer
            .exec(move |conn| {
                diesel::insert_into(products::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|e| e.into_core_error())?;
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl ProductReaderTrait for ProductRepository {
    async fn get_by_id(&self, product_id: &str) -> Result<Option<Product>> {
        let mut conn = get_connection(&self.pool)?;

        let row = products
            .select(ProductDB::as_select())
            .find(product_id)
            .first::<ProductDB>(&mut conn)
            .optional()
            .map_err(|e| e.into_core_error())?;

        row.map(Product::try_from).transpose()
    }
}
