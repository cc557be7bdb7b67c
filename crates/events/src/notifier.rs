//! Synchronous publish/subscribe channel.
//!
//! Handlers run on the caller's thread, in subscription order, before
//! [`Notifier::notify`] returns. A notifier is created per generation run and
//! handed explicitly to the writers that need it; clones share one subscriber
//! list.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Multi-subscriber, synchronous notification channel.
pub struct Notifier<T = String> {
    subscribers: Arc<Mutex<Vec<Handler<T>>>>,
}

impl<T> Notifier<T> {
    /// Create a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a handler for every subsequent [`notify`](Self::notify).
    ///
    /// There is no unsubscribe; subscriber lists live for one run.
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(handler));
    }

    /// Deliver `payload` to every current subscriber.
    ///
    /// A notifier without subscribers ignores the call. Handlers registered
    /// while delivery is in progress do not receive this payload.
    pub fn notify(&self, payload: &T) {
        let handlers: Vec<Handler<T>> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        tracing::trace!(subscribers = handlers.len(), "Delivering notification");

        for handler in &handlers {
            handler(payload);
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T> Clone for Notifier<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
