use thiserror::Error;

/// Callback invoked with the UTF-8 payload of every message on a topic.
/// May be called from a background thread owned by the channel.
pub type MessageHandler = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("not connected to broker")]
    Disconnected,
    #[error("{0}")]
    Rejected(String),
}

/// Publish/subscribe transport between the console and the machine controller.
///
/// Publishing never blocks on the network: it either hands the message to the
/// transport or fails immediately. Retries belong to the implementation.
pub trait MessageChannel: Send + Sync {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError>;

    /// Registers `handler` for `topic`. Failures are the implementation's to
    /// report; a subscription may simply stay silent.
    fn subscribe(&self, topic: &str, handler: MessageHandler);
}
