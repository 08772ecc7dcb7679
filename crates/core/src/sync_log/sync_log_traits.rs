//! Sync log repository trait.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{NewSyncLogEntry, SyncLogEntry};
use crate::errors::Result;

/// Trait defining the contract for the append-only sync log.
#[async_trait]
pub trait SyncLogRepositoryTrait: Send + Sync {
    /// Appends one entry. There is deliberately no update or delete.
    async fn append(&self, entry: NewSyncLogEntry) -> Result<SyncLogEntry>;

    /// Most recent entries for a user, newest first.
    fn list_recent(&self, user_id: &str, limit: i64) -> Result<Vec<SyncLogEntry>>;

    /// Sum of `cost_saved` across all of a user's entries.
    fn total_cost_saved(&self, user_id: &str) -> Result<Decimal>;
}
