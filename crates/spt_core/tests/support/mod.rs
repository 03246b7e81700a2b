#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use spt_core::{LogSettings, MessageChannel, MessageHandler, PublishError, SessionState};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(spt_logging::initialize_for_tests);
}

/// Records publishes, fails chosen attempts, and lets a test play the controller.
#[derive(Default)]
pub struct ScriptedChannel {
    fail_on: Vec<usize>,
    attempts: AtomicUsize,
    published: Mutex<Vec<(String, String)>>,
    handlers: Mutex<Vec<(String, MessageHandler)>>,
}

impl ScriptedChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fails the given 1-based publish attempts.
    pub fn failing_on(attempts: &[usize]) -> Arc<Self> {
        Arc::new(Self {
            fail_on: attempts.to_vec(),
            ..Self::default()
        })
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn subscribed_topics(&self) -> Vec<String> {
        self.handlers
            .lock()
            .unwrap()
            .iter()
            .map(|(topic, _)| topic.clone())
            .collect()
    }

    /// Delivers `payload` to every handler subscribed to `topic`.
    pub fn deliver(&self, topic: &str, payload: &str) {
        for (subscribed, handler) in self.handlers.lock().unwrap().iter() {
            if subscribed == topic {
                handler(payload);
            }
        }
    }
}

impl MessageChannel for ScriptedChannel {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&attempt) {
            return Err(PublishError::Rejected(format!("broker refused attempt {attempt}")));
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }

    fn subscribe(&self, topic: &str, handler: MessageHandler) {
        self.handlers
            .lock()
            .unwrap()
            .push((topic.to_string(), handler));
    }
}

pub fn session_with(channel: &Arc<ScriptedChannel>) -> SessionState {
    let channel: Arc<dyn MessageChannel> = channel.clone();
    SessionState::new(channel, LogSettings::default())
}

pub fn log_texts(state: &SessionState) -> Vec<String> {
    state
        .log()
        .snapshot()
        .into_iter()
        .map(|entry| entry.text)
        .collect()
}
