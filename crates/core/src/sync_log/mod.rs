//! Sync log module - the append-only audit trail of orchestration outcomes.

mod sync_log_model;
mod sync_log_traits;

pub use sync_log_model::{NewSyncLogEntry, SyncAction, SyncLogEntry, SyncStatus};
pub use sync_log_traits::SyncLogRepositoryTrait;
