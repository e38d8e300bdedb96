//! Favorites change broadcasting
//!
//! `EventBus` tells every subscriber that the favorites record changed.
//! The event carries no data; subscribers re-read the store. Each
//! subscriber holds at most one pending event, so notifications that arrive
//! before it drains merge into one.

use std::sync::Mutex;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Emitted after every successful favorites write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoritesUpdated;

/// Broadcast mechanism for favorites changes
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<FavoritesUpdated>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventBus {
    /// Create a new event bus with no subscribers
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to events. Returns a receiver notified of future changes.
    ///
    /// Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> Receiver<FavoritesUpdated> {
        let (tx, rx) = bounded(1);
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    /// Emit to all subscribers. Removes disconnected subscribers.
    ///
    /// A subscriber with an event still pending is already notified.
    pub fn emit(&self) {
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.retain(|tx| match tx.try_send(FavoritesUpdated) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// Number of registered subscribers (including ones dropped since the last emit)
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_bus_subscribe_and_emit() {
        let bus = EventBus::new();
        let rx = bus.subscribe();

        bus.emit();

        assert_eq!(rx.try_recv().unwrap(), FavoritesUpdated);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn event_bus_multiple_subscribers() {
        let bus = EventBus::new();
        let rx1 = bus.subscribe();
        let rx2 = bus.subscribe();

        bus.emit();

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn event_bus_dropped_subscriber_is_pruned() {
        let bus = EventBus::new();
        let rx1 = bus.subscribe();
        let rx2 = bus.subscribe();
        drop(rx1);
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit();

        assert_eq!(bus.subscriber_count(), 1);
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn event_bus_no_subscribers() {
        let bus = EventBus::new();
        bus.emit();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn event_bus_pending_events_merge() {
        let bus = EventBus::new();
        let rx = bus.subscribe();

        bus.emit();
        bus.emit();
        bus.emit();

        assert_eq!(rx.try_iter().count(), 1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn event_bus_notifies_again_after_drain() {
        let bus = EventBus::new();
        let rx = bus.subscribe();

        bus.emit();
        assert!(rx.try_recv().is_ok());

        bus.emit();
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn event_bus_full_subscriber_still_pruned_when_dropped() {
        let bus = EventBus::new();
        let rx = bus.subscribe();
        bus.emit();
        drop(rx);

        bus.emit();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn event_bus_debug_shows_count() {
        let bus = EventBus::new();
        let _rx = bus.subscribe();
        assert!(format!("{:?}", bus).contains("subscribers: 1"));
    }
}
