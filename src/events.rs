//! Cross-fragment language bus.
//!
//! Independently mounted coordinators and scopes have no shared parent, so
//! language changes travel over the bus. Registered listeners are updated
//! inside `publish`, before it returns. Raw subscribers receive the same event
//! over a broadcast channel. Publishing is fire-and-forget: having no
//! subscribers is not an error.

use crate::i18n::LanguageDescriptor;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

/// Name under which language changes are announced
pub const LANGUAGE_CHANGED_EVENT: &str = "languageChanged";

const DEFAULT_CAPACITY: usize = 16;

/// Identity of a publisher on one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin(u64);

/// Payload of a `languageChanged` event. Serializes as `{ "language": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageChanged {
    #[serde(skip)]
    pub origin: Origin,
    pub language: LanguageDescriptor,
}

/// Receiver of changes published by other origins.
pub trait LanguageListener: Send + Sync {
    fn on_language_changed(&self, event: &LanguageChanged);
}

type Listeners = Vec<(Origin, Weak<dyn LanguageListener>)>;

#[derive(Clone)]
pub struct LanguageBus {
    sender: broadcast::Sender<LanguageChanged>,
    next_origin: Arc<AtomicU64>,
    listeners: Arc<Mutex<Listeners>>,
}

impl std::fmt::Debug for LanguageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageBus")
            .field("subscribers", &self.subscriber_count())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl LanguageBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` bounds how far a slow subscriber may fall behind before it
    /// skips to the most recent events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            next_origin: Arc::new(AtomicU64::new(1)),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Allocate a fresh origin for a new publisher.
    pub fn register_origin(&self) -> Origin {
        Origin(self.next_origin.fetch_add(1, Ordering::Relaxed))
    }

    /// Register `listener` to be told about every change not published by
    /// `origin`. The bus only holds a weak reference.
    pub fn register_listener(&self, origin: Origin, listener: Weak<dyn LanguageListener>) {
        self.lock_listeners().push((origin, listener));
    }

    pub fn unregister_listener(&self, origin: Origin) {
        self.lock_listeners().retain(|(registered, _)| *registered != origin);
    }

    pub fn listener_count(&self) -> usize {
        let mut listeners = self.lock_listeners();
        listeners.retain(|(_, listener)| listener.strong_count() > 0);
        listeners.len()
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Publish an event. Every listener registered under another origin has
    /// been notified when this returns.
    ///
    /// Returns the number of listeners and subscribers it reached.
    pub fn publish(&self, event: LanguageChanged) -> usize {
        let code = event.language.code.clone();

        let targets: Vec<Arc<dyn LanguageListener>> = {
            let mut listeners = self.lock_listeners();
            listeners.retain(|(_, listener)| listener.strong_count() > 0);
            listeners
                .iter()
                .filter(|(origin, _)| *origin != event.origin)
                .filter_map(|(_, listener)| listener.upgrade())
                .collect()
        };
        for listener in &targets {
            listener.on_language_changed(&event);
        }
        let notified = targets.len();

        match self.sender.send(event) {
            Ok(count) => {
                debug!(
                    "Published {} ({}) to {} listeners and {} subscribers",
                    LANGUAGE_CHANGED_EVENT, code, notified, count
                );
                notified + count
            }
            Err(_) => {
                debug!(
                    "Published {} ({}) to {} listeners and no subscribers",
                    LANGUAGE_CHANGED_EVENT, code, notified
                );
                notified
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LanguageBus {
    fn default() -> Self {
        Self::new()
    }
}

/// One listener on the bus. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<LanguageChanged>,
}

impl Subscription {
    /// Wait for the next event.
    ///
    /// A lagging subscriber skips ahead rather than failing. Returns `None`
    /// once every bus handle has been dropped.
    pub async fn next(&mut self) -> Option<LanguageChanged> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Language subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next already-delivered event without waiting.
    pub fn try_next(&mut self) -> Option<LanguageChanged> {
        use broadcast::error::TryRecvError;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(bus: &LanguageBus, code: &str) -> LanguageChanged {
        LanguageChanged {
            origin: bus.register_origin(),
            language: LanguageDescriptor::from_code(code).unwrap(),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let bus = LanguageBus::new();
        assert_eq!(bus.publish(event(&bus, "hi")), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let bus = LanguageBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(event(&bus, "ta")), 2);

        assert_eq!(first.next().await.unwrap().language.code, "ta");
        assert_eq!(second.next().await.unwrap().language.code, "ta");
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let bus = LanguageBus::new();
        let subscription = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_origins_are_unique_across_clones() {
        let bus = LanguageBus::new();
        let clone = bus.clone();
        assert_ne!(bus.register_origin(), clone.register_origin());
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_to_recent_events() {
        let bus = LanguageBus::with_capacity(2);
        let mut subscription = bus.subscribe();

        for code in ["hi", "en", "bn", "ta"] {
            bus.publish(event(&bus, code));
        }

        assert_eq!(subscription.next().await.unwrap().language.code, "bn");
        assert_eq!(subscription.next().await.unwrap().language.code, "ta");
        assert!(subscription.try_next().is_none());
    }

    #[tokio::test]
    async fn test_next_returns_none_when_bus_dropped() {
        let bus = LanguageBus::new();
        let mut subscription = bus.subscribe();
        drop(bus);

        assert!(subscription.next().await.is_none());
    }

    #[derive(Default)]
    struct RecordingListener {
        seen: Mutex<Vec<String>>,
    }

    impl LanguageListener for RecordingListener {
        fn on_language_changed(&self, event: &LanguageChanged) {
            self.seen.lock().unwrap().push(event.language.code.clone());
        }
    }

    fn register(bus: &LanguageBus, origin: Origin) -> Arc<RecordingListener> {
        let listener = Arc::new(RecordingListener::default());
        let weak: Weak<RecordingListener> = Arc::downgrade(&listener);
        bus.register_listener(origin, weak);
        listener
    }

    // ==================== Listener Tests ====================

    #[test]
    fn test_listeners_are_notified_before_publish_returns() {
        let bus = LanguageBus::new();
        let first = register(&bus, bus.register_origin());
        let second = register(&bus, bus.register_origin());

        assert_eq!(bus.publish(event(&bus, "ta")), 2);

        assert_eq!(*first.seen.lock().unwrap(), vec!["ta"]);
        assert_eq!(*second.seen.lock().unwrap(), vec!["ta"]);
    }

    #[test]
    fn test_listener_skips_its_own_origin() {
        let bus = LanguageBus::new();
        let origin = bus.register_origin();
        let listener = register(&bus, origin);

        let own = LanguageChanged {
            origin,
            language: LanguageDescriptor::from_code("bn").unwrap(),
        };
        assert_eq!(bus.publish(own), 0);
        assert!(listener.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dropped_listener_is_pruned() {
        let bus = LanguageBus::new();
        let listener = register(&bus, bus.register_origin());
        assert_eq!(bus.listener_count(), 1);

        drop(listener);
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(bus.publish(event(&bus, "hi")), 0);
    }

    #[test]
    fn test_unregister_listener() {
        let bus = LanguageBus::new();
        let origin = bus.register_origin();
        let listener = register(&bus, origin);

        bus.unregister_listener(origin);
        bus.publish(event(&bus, "te"));

        assert_eq!(bus.listener_count(), 0);
        assert!(listener.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_listeners_and_subscribers_both_receive() {
        let bus = LanguageBus::new();
        let listener = register(&bus, bus.register_origin());
        let mut subscription = bus.subscribe();

        assert_eq!(bus.publish(event(&bus, "kn")), 2);

        assert_eq!(*listener.seen.lock().unwrap(), vec!["kn"]);
        assert_eq!(subscription.try_next().unwrap().language.code, "kn");
    }

    #[test]
    fn test_payload_shape() {
        let bus = LanguageBus::new();
        let json = serde_json::to_value(event(&bus, "hi")).unwrap();

        assert_eq!(json["language"]["code"], "hi");
        assert!(json.get("origin").is_none());
    }
}
