use std::sync::OnceLock;

use super::{GuardEvent, Listener};

static REGISTRY: OnceLock<EventRegistry> = OnceLock::new();

/// Listeners registered at startup, called in registration order.
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventRegistry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    async fn dispatch(&self, event: &GuardEvent) {
        for listener in &self.listeners {
            listener.handle(event).await;
        }
    }
}

/// Installs the process-wide listeners. Only the first call takes effect;
/// later calls log a warning and are ignored.
pub fn register_event_listeners<F>(f: F)
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::new();
    f(&mut registry);
    if REGISTRY.set(registry).is_err() {
        log::warn!(
            target: "waypost",
            "msg=\"register_event_listeners called more than once, ignoring\""
        );
    }
}

pub async fn dispatch(event: GuardEvent) {
    if let Some(registry) = REGISTRY.get() {
        registry.dispatch(&event).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;

    struct Counter(Arc<AtomicUsize>);

    #[async_trait]
    impl Listener for Counter {
        async fn handle(&self, _event: &GuardEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_local_registry_dispatches_in_order() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = EventRegistry::new();
        registry
            .listen(Counter(Arc::clone(&count)))
            .listen(Counter(Arc::clone(&count)));
        assert_eq!(registry.len(), 2);

        registry
            .dispatch(&GuardEvent::NavigationAllowed {
                path: "/".to_owned(),
                at: Utc::now(),
            })
            .await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_registry() {
        assert!(EventRegistry::new().is_empty());
    }
}
