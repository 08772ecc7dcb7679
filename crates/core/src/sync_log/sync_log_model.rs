//! Sync log domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sellbridge_marketplace::Marketplace;

/// One immutable audit record of an orchestration outcome.
///
/// Entries are append-only: never mutated, never deleted. They feed the
/// activity feed and the cost-savings rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncLogEntry {
    pub id: String,
    pub user_id: String,
    pub marketplace: Marketplace,
    pub action: SyncAction,
    pub status: SyncStatus,
    pub message: String,
    pub cost_saved: Option<Decimal>,
    pub created_at: NaiveDateTime,
}

/// What the orchestrator was doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncAction {
    Create,
    Update,
    Relist,
    Sync,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Create => "CREATE",
            SyncAction::Update => "UPDATE",
            SyncAction::Relist => "RELIST",
            SyncAction::Sync => "SYNC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            "RELIST" => Some(Self::Relist),
            "SYNC" => Some(Self::Sync),
            _ => None,
        }
    }
}

/// How it went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Success,
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Success => "SUCCESS",
            SyncStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUCCESS" => Some(Self::Success),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Payload for appending a log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSyncLogEntry {
    pub user_id: String,
    pub marketplace: Marketplace,
    pub action: SyncAction,
    pub status: SyncStatus,
    pub message: String,
    pub cost_saved: Option<Decimal>,
}
