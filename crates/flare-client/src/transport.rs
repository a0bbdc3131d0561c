//! Transport boundary for finished events

use std::sync::{Arc, Mutex};

use flare_core::{Event, EventId};
use tracing::debug;

/// Delivers finished events to the remote collector
///
/// The pipeline is agnostic to how or whether delivery succeeds and never
/// retries; `None` means the transport did not accept the event.
pub trait Transport: Send + Sync {
    fn send(&self, event: Event) -> Option<EventId>;
}

/// Transport that discards every event, used when no collector is configured
pub struct NoopTransport;

impl Transport for NoopTransport {
    fn send(&self, event: Event) -> Option<EventId> {
        debug!(event_id = %event.event_id, "transport disabled, discarding event");
        None
    }
}

/// In-memory transport for tests and local inspection
#[derive(Default)]
pub struct MemoryTransport {
    events: Mutex<Vec<Event>>,
}

impl MemoryTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Events accepted so far, oldest first
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("transport mutex poisoned").clone()
    }
}

impl Transport for MemoryTransport {
    fn send(&self, event: Event) -> Option<EventId> {
        let event_id = event.event_id;
        self.events
            .lock()
            .expect("transport mutex poisoned")
            .push(event);
        Some(event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_transport_acknowledges_with_event_id() {
        let transport = MemoryTransport::new();
        let event = Event::new();
        let expected = event.event_id;

        let acknowledged = transport.send(event).expect("event accepted");
        assert_eq!(acknowledged, expected);
        assert_eq!(transport.events().len(), 1);
    }

    #[test]
    fn test_noop_transport_discards() {
        assert!(NoopTransport.send(Event::new()).is_none());
    }
}
