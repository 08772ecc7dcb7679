//! Server event bus and SSE delivery.
//!
//! Domain events from core services land on a broadcast channel; the
//! `/api/events` SSE endpoint replays them to connected clients.

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use sellbridge_core::events::{DomainEvent, DomainEventSink};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A named event with a JSON payload, as delivered over SSE.
#[derive(Debug, Clone, Serialize)]
pub struct ServerEvent {
    pub name: String,
    pub payload: serde_json::Value,
}

/// Broadcast fan-out of server events. Cheap to clone; slow subscribers
/// miss events rather than applying backpressure to emitters.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: ServerEvent) {
        // No subscribers is a normal state, not an error.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter that feeds core domain events onto the bus.
pub struct BusEventSink {
    bus: EventBus,
}

impl BusEventSink {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl DomainEventSink for BusEventSink {
    fn emit(&self, event: DomainEvent) {
        let payload = serde_json::to_value(&event).unwrap_or_default();
        // The serde tag doubles as the SSE event name.
        let name = payload
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or("domain_event")
            .to_string();
        self.bus.publish(ServerEvent { name, payload });
    }
}

/// Builds the SSE response for one subscriber.
pub fn sse_stream(
    bus: &EventBus,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(bus.subscribe()).filter_map(|item| match item {
        Ok(event) => {
            let sse_event = Event::default()
                .event(event.name)
                .data(event.payload.to_string());
            Some(Ok(sse_event))
        }
        // A lagged subscriber skips what it missed and keeps listening.
        Err(BroadcastStreamRecvError::Lagged(_)) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
