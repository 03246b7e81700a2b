//! SPT core: stage configuration, presets, start commands, the operator log
//! and the session state the presentation shell drives.
mod channel;
mod command;
mod effect;
mod job;
mod msg;
mod operator_log;
mod preset;
mod session;
mod stage;
mod update;
mod view_model;

pub use channel::{MessageChannel, MessageHandler, PublishError};
pub use command::{build_start_commands, start_payload, StartCommand, COMMAND_TOPIC, LOG_TOPIC};
pub use effect::{Effect, Severity};
pub use job::{JobConfig, Material, STAGE_COUNT};
pub use msg::Msg;
pub use operator_log::{LogAggregator, LogEntry, LogOrigin, LogSettings, REMOTE_LOG_CAPACITY};
pub use preset::{decode, encode, DecodeError, EncodeError, PresetFormat, PRESET_VERSION};
pub use session::{SessionState, StartReport};
pub use stage::{
    Program, StageConfig, StageDraft, ValidationError, CYCLES_RANGE, DEFAULT_CYCLES,
    DEFAULT_SPEED_HZ, SPEED_HZ_RANGE,
};
pub use update::update;
pub use view_model::{ConsoleViewModel, StageRowView};
