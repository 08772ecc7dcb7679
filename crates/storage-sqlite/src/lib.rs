//! SQLite storage implementation for Sellbridge.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `sellbridge-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for credentials, listings, sync logs,
//!   and the read-only product view
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel
//! dependencies exist. All other crates (`core`, `marketplace`) are
//! database-agnostic and work with traits.
//!
//! ```text
//! core (domain)       marketplace (providers)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod credentials;
pub mod listings;
pub mod products;
pub mod sync_log;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle};

// Re-export storage errors and conversion helpers
pub use errors::StorageError;

// Re-export from sellbridge-core for convenience
pub use sellbridge_core::errors::{DatabaseError, Error, Result};
