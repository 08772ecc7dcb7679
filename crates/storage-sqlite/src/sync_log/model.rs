//! Database model for sync log entries.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::errors::StorageError;
use sellbridge_core::errors::Error;
use sellbridge_core::sync_log::{NewSyncLogEntry, SyncAction, SyncLogEntry, SyncStatus};
use sellbridge_marketplace::Marketplace;

/// Database model for sync log entries
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::sync_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SyncLogEntryDB {
    pub id: String,
    pub user_id: String,
    pub marketplace: String,
    pub action: String,
    pub status: String,
    pub message: String,
    pub cost_saved: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<SyncLogEntryDB> for SyncLogEntry {
    type Error = Error;

    fn try_from(db: SyncLogEntryDB) -> Result<Self, Error> {
        let corrupt = |what: &str, value: &str| {
            StorageError::CorruptRow(format!("sync log {} has unknown {} '{}'", db.id, what, value))
        };
        let marketplace =
            Marketplace::from_str(&db.marketplace).map_err(|_| corrupt("marketplace", &db.marketplace))?;
        let action = SyncAction::parse(&db.action).ok_or_else(|| corrupt("action", &db.action))?;
        let status = SyncStatus::parse(&db.status).ok_or_else(|| corrupt("status", &db.status))?;
        let cost_saved = db
            .cost_saved
            .as_deref()
            .map(Decimal::from_str)
            .transpose()
            .map_err(|e| {
                StorageError::CorruptRow(format!("sync log {} has bad cost_saved: {}", db.id, e))
            })?;
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            marketplace,
            action,
            status,
            message: db.message,
            cost_saved,
            created_at: db.created_at,
        })
    }
}

impl From<NewSyncLogEntry> for SyncLogEntryDB {
    fn from(domain: NewSyncLogEntry) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: domain.user_id,
            marketplace: domain.marketplace.as_str().to_string(),
            action: domain.action.as_str().to_string(),
            status: domain.status.as_str().to_string(),
            message: domain.message,
            cost_saved: domain.cost_saved.map(|d| d.to_string()),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
