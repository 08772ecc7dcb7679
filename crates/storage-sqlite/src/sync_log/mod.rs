//! Sync log storage.

mod model;
mod repository;

pub use model::SyncLogEntryDB;
pub use repository::SyncLogRepository;
