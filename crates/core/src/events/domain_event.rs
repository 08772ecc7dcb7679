//! Domain event types.

use serde::{Deserialize, Serialize};

use sellbridge_marketplace::Marketplace;

/// Domain events emitted by core services during orchestration.
///
/// These events represent facts about sync progress and listing changes.
/// Runtime adapters translate them into platform-specific delivery
/// (SSE stream, notification center, activity feed refresh).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A fan-out operation advanced by one marketplace.
    SyncProgress {
        operation: String,
        current: usize,
        total: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        marketplace: Option<Marketplace>,
        product_title: String,
    },

    /// A listing was created, relisted, or updated on one marketplace.
    ListingUpdate {
        product_id: String,
        marketplace: Marketplace,
        status: String,
        message: String,
    },

    /// A user-facing notification (typically a failure the user can act on).
    Notification {
        kind: NotificationKind,
        title: String,
        message: String,
    },

    /// Outcome of one marketplace's unit of work within a sync operation.
    SyncUpdate {
        operation: String,
        status: SyncOutcome,
        #[serde(skip_serializing_if = "Option::is_none")]
        marketplace: Option<Marketplace>,
        product_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

/// Severity of a [`DomainEvent::Notification`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// Terminal outcome of one marketplace task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    Success,
    Failed,
}

impl DomainEvent {
    /// Creates a SyncProgress event.
    pub fn sync_progress(
        operation: impl Into<String>,
        current: usize,
        total: usize,
        marketplace: Option<Marketplace>,
        product_title: impl Into<String>,
    ) -> Self {
        Self::SyncProgress {
            operation: operation.into(),
            current,
            total,
            marketplace,
            product_title: product_title.into(),
        }
    }

    /// Creates a ListingUpdate event.
    pub fn listing_update(
        product_id: impl Into<String>,
        marketplace: Marketplace,
        status: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ListingUpdate {
            product_id: product_id.into(),
            marketplace,
            status: status.into(),
            message: message.into(),
        }
    }

    /// Creates a Notification event.
    pub fn notification(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Notification {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Creates a SyncUpdate event.
    pub fn sync_update(
        operation: impl Into<String>,
        status: SyncOutcome,
        marketplace: Option<Marketplace>,
        product_id: impl Into<String>,
        error: Option<String>,
    ) -> Self {
        Self::SyncUpdate {
            operation: operation.into(),
            status,
            marketplace,
            product_id: product_id.into(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_event_serialization() {
        let event = DomainEvent::sync_progress(
            "cross_list",
            1,
            2,
            Some(Marketplace::Ebay),
            "Vintage camera",
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("sync_progress"));
        assert!(json.contains("\"EBAY\""));

        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();
        match deserialized {
            DomainEvent::SyncProgress {
                current,
                total,
                marketplace,
                ..
            } => {
                assert_eq!(current, 1);
                assert_eq!(total, 2);
                assert_eq!(marketplace, Some(Marketplace::Ebay));
            }
            _ => panic!("Expected SyncProgress"),
        }
    }

    #[test]
    fn test_sync_update_omits_absent_error() {
        let event = DomainEvent::sync_update(
            "inventory_sync",
            SyncOutcome::Success,
            Some(Marketplace::Etsy),
            "p1",
            None,
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("\"error\""));
        assert!(json.contains("\"success\""));
    }
}
