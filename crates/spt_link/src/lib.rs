//! SPT link: message channel transports and preset storage.
mod loopback;
mod mqtt;
mod preset_store;
mod settings;

pub use loopback::LoopbackChannel;
pub use mqtt::{LinkError, MqttChannel};
pub use preset_store::{ensure_preset_dir, AtomicFileWriter, PresetStore, StoreError};
pub use settings::{Credentials, LinkSettings};
