//! Diesel-backed sync log repository.
//!
//! The log is append-only: this repository deliberately exposes no
//! update or delete.

use async_trait::async_trait;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::DieselErrorExt;
use crate::schema::sync_logs;
use crate::schema::sync_logs::dsl::*;

use super::model::SyncLogEntryDB;
use sellbridge_core::errors::Result;
use sellbridge_core::sync_log::{NewSyncLogEntry, SyncLogEntry, SyncLogRepositoryTrait};

/// Repository for the append-only sync log.
pub struct SyncLogRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SyncLogRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SyncLogRepositoryTrait for SyncLogRepository {
    async fn append(&self, entry: NewSyncLogEntry) -> Result<SyncLogEntry> {
        self.writer
            .exec(move |conn| {
                let row: SyncLogEntryDB = entry.into();
                diesel::insert_into(sync_logs::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|e| e.into_core_error())?;
                SyncLogEntry::try_from(row)
            })
            .await
    }

    fn list_recent(&self, user: &str, limit: i64) -> Result<Vec<SyncLogEntry>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<SyncLogEntryDB> = sync_logs
            .select(SyncLogEntryDB::as_select())
            .filter(user_id.eq(user))
            .order(created_at.desc())
            .limit(limit)
            .load(&mut conn)
            .map_err(|e| e.into_core_error())?;

        rows.into_iter().map(SyncLogEntry::try_from).collect()
    }

    fn total_cost_saved(&self, user: &str) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;

        let values: Vec<Option<String>> = sync_logs
            .filter(user_id.eq(user))
            .select(cost_saved)
            .load(&mut conn)
            .map_err(|e| e.into_core_error())?;

        // Decimal lives as text in SQLite; sum on the Rust side.
        Ok(values
            .into_iter()
            .flatten()
            .filter_map(|v| Decimal::from_str(&v).ok())
            .sum())
    }
}
