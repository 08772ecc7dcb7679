//! Domain events emitted by core services.

mod domain_event;
mod sink;

pub use domain_event::{DomainEvent, NotificationKind, SyncOutcome};
pub use sink::{DomainEventSink, MockDomainEventSink, NoOpDomainEventSink};
