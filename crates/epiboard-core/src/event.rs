//! Event bus for session changes using tokio::broadcast
//!
//! Consumers (CLI watch mode, web server, tests) subscribe instead of
//! polling the session store.

use epiboard_types::CountryCode;
use tokio::sync::broadcast;

/// Events emitted by the session store
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Startup hydration finished
    Hydrated { authenticated: bool },
    LoggedIn { username: String },
    LoggedOut,
    CountrySwitched(CountryCode),
    /// A request came back 401/403 and the session was dropped
    Expired { status: u16 },
}

/// Event bus for broadcasting session events
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (64 events)
    pub fn default_capacity() -> Self {
        Self::new(64)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: SessionEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.publish(SessionEvent::LoggedIn {
            username: "ana".to_string(),
        });
        bus.publish(SessionEvent::CountrySwitched(CountryCode::Fr));

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, SessionEvent::LoggedIn { username } if username == "ana"));
        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::CountrySwitched(CountryCode::Fr)
        );
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::default_capacity();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.clone().subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(SessionEvent::LoggedOut);
        assert_eq!(rx1.recv().await.unwrap(), SessionEvent::LoggedOut);
        assert_eq!(rx2.recv().await.unwrap(), SessionEvent::LoggedOut);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        bus.publish(SessionEvent::Expired { status: 401 });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
