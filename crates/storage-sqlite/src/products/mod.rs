//! Product storage (read-only boundary).

mod model;
mod repository;

pub use model::ProductDB;
pub use repository::ProductRepository;
