use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use spt_core::{MessageChannel, MessageHandler, PublishError};
use spt_logging::spt_debug;

#[derive(Default)]
struct Inner {
    online: bool,
    published: Vec<(String, String)>,
    subscriptions: Vec<(String, Arc<MessageHandler>)>,
}

/// In-process channel: publishes are recorded and delivered to local
/// subscribers of the same topic. Used for offline operation and tests.
#[derive(Clone)]
pub struct LoopbackChannel {
    inner: Arc<Mutex<Inner>>,
}

impl Default for LoopbackChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackChannel {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                online: true,
                ..Inner::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// While offline every publish fails with [`PublishError::Disconnected`].
    pub fn set_online(&self, online: bool) {
        self.lock().online = online;
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.lock().published.clone()
    }

    /// Delivers a message as if it came from another client.
    pub fn inject(&self, topic: &str, payload: &str) {
        // Handlers run without the lock held so they may publish themselves.
        let handlers: Vec<_> = self
            .lock()
            .subscriptions
            .iter()
            .filter(|(subscribed, _)| subscribed == topic)
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(payload);
        }
    }
}

impl MessageChannel for LoopbackChannel {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        {
            let mut inner = self.lock();
            if !inner.online {
                return Err(PublishError::Disconnected);
            }
            inner
                .published
                .push((topic.to_string(), payload.to_string()));
        }
        spt_debug!("Loopback publish {} {}", topic, payload);
        self.inject(topic, payload);
        Ok(())
    }

    fn subscribe(&self, topic: &str, handler: MessageHandler) {
        self.lock()
            .subscriptions
            .push((topic.to_string(), Arc::new(handler)));
    }
}
