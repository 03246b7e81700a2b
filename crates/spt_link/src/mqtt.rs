use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Outgoing, Packet, QoS};
use spt_core::{MessageChannel, MessageHandler, PublishError};
use spt_logging::{spt_debug, spt_info, spt_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::LinkSettings;

/// How long a dropped channel keeps polling to hand DISCONNECT to the broker.
const DISCONNECT_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("failed to start channel worker: {0}")]
    Worker(#[from] std::io::Error),
}

struct Subscription {
    topic: String,
    handler: Arc<MessageHandler>,
}

#[derive(Default)]
struct Shared {
    connected: AtomicBool,
    subscriptions: RwLock<Vec<Subscription>>,
}

impl Shared {
    fn topics(&self) -> Vec<String> {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|sub| sub.topic.clone())
            .collect()
    }

    fn add(&self, topic: &str, handler: MessageHandler) {
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscription {
                topic: topic.to_string(),
                handler: Arc::new(handler),
            });
    }

    /// Exact topic match; wildcard filters are not supported. Handlers run
    /// after the lock is released, so they may subscribe themselves.
    fn dispatch(&self, topic: &str, payload: &str) {
        let handlers: Vec<_> = self
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|sub| sub.topic == topic)
            .map(|sub| Arc::clone(&sub.handler))
            .collect();
        for handler in handlers {
            handler(payload);
        }
    }
}

/// [`MessageChannel`] over an MQTT broker.
///
/// The broker event loop runs on its own thread with a private tokio runtime.
/// Subscriptions are renewed on every connection acknowledgement, so they
/// survive reconnects.
pub struct MqttChannel {
    client: AsyncClient,
    shared: Arc<Shared>,
    shutdown: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl MqttChannel {
    pub fn connect(settings: LinkSettings) -> Result<Self, LinkError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (client, eventloop) =
            AsyncClient::new(settings.mqtt_options(), settings.request_capacity);
        let shared = Arc::new(Shared::default());
        let shutdown = CancellationToken::new();

        let worker = {
            let client = client.clone();
            let shared = Arc::clone(&shared);
            let shutdown = shutdown.clone();
            let reconnect_delay = settings.reconnect_delay;
            thread::Builder::new()
                .name("spt-mqtt".to_string())
                .spawn(move || {
                    runtime.block_on(drive(eventloop, client, shared, shutdown, reconnect_delay));
                })?
        };

        spt_info!(
            "MQTT channel started for {}:{} as {}",
            settings.broker_host,
            settings.broker_port,
            settings.client_id
        );
        Ok(Self {
            client,
            shared,
            shutdown,
            worker: Some(worker),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }
}

impl MessageChannel for MqttChannel {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        if !self.is_connected() {
            return Err(PublishError::Disconnected);
        }
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload.as_bytes().to_vec())
            .map_err(|err| PublishError::Rejected(err.to_string()))
    }

    fn subscribe(&self, topic: &str, handler: MessageHandler) {
        self.shared.add(topic, handler);
        // Otherwise the next ConnAck subscribes.
        if self.is_connected() {
            if let Err(err) = self.client.try_subscribe(topic, QoS::AtMostOnce) {
                spt_warn!("Subscribe to {} failed: {}", topic, err);
            }
        }
    }
}

impl Drop for MqttChannel {
    /// Queues a DISCONNECT and gives the worker [`DISCONNECT_GRACE`] to send
    /// it before the connection is dropped.
    fn drop(&mut self) {
        if self.is_connected() {
            if let Err(err) = self.client.try_disconnect() {
                spt_debug!("DISCONNECT not queued: {}", err);
            }
        }
        self.shutdown.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

async fn drive(
    mut eventloop: EventLoop,
    client: AsyncClient,
    shared: Arc<Shared>,
    shutdown: CancellationToken,
    reconnect_delay: Duration,
) {
    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => None,
            event = eventloop.poll() => Some(event),
        };
        let Some(event) = event else {
            flush_disconnect(&mut eventloop, &shared).await;
            break;
        };

        match event {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                shared.connected.store(true, Ordering::SeqCst);
                spt_info!("Connected to broker");
                for topic in shared.topics() {
                    match client.try_subscribe(topic.as_str(), QoS::AtMostOnce) {
                        Ok(()) => spt_debug!("Subscribed to {}", topic),
                        Err(err) => spt_warn!("Subscribe to {} failed: {}", topic, err),
                    }
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let payload = String::from_utf8_lossy(&publish.payload);
                shared.dispatch(&publish.topic, &payload);
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                shared.connected.store(false, Ordering::SeqCst);
                spt_warn!("Broker closed the connection");
            }
            Ok(_) => {}
            Err(err) => {
                if shared.connected.swap(false, Ordering::SeqCst) {
                    spt_warn!("Lost broker connection: {}", err);
                } else {
                    spt_debug!("Broker unreachable: {}", err);
                }
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(reconnect_delay) => {}
                }
            }
        }
    }
    spt_info!("MQTT channel stopped");
}

/// Polls until the queued DISCONNECT has gone out, bounded by the grace period.
async fn flush_disconnect(eventloop: &mut EventLoop, shared: &Shared) {
    if !shared.connected.swap(false, Ordering::SeqCst) {
        return;
    }
    let sent = tokio::time::timeout(DISCONNECT_GRACE, async {
        loop {
            match eventloop.poll().await {
                Ok(Event::Outgoing(Outgoing::Disconnect)) => return true,
                Ok(_) => {}
                Err(_) => return false,
            }
        }
    })
    .await;
    match sent {
        Ok(true) => spt_debug!("DISCONNECT sent to broker"),
        _ => spt_warn!("Closing broker connection without DISCONNECT"),
    }
}
