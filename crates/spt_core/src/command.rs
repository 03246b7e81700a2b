use crate::job::JobConfig;
use crate::stage::StageConfig;

/// Topic the machine controller reads commands from.
pub const COMMAND_TOPIC: &str = "teensy/command";
/// Topic the machine controller writes its log lines to.
pub const LOG_TOPIC: &str = "teensy/log";

/// A command addressed to one stage, ready to publish on [`COMMAND_TOPIC`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCommand {
    pub stage: usize,
    pub payload: String,
}

/// Wire format: `START:<program>,<speedHz>,<cycles>`.
pub fn start_payload(stage: &StageConfig) -> String {
    format!(
        "START:{},{},{}",
        stage.program(),
        stage.speed_hz(),
        stage.cycles()
    )
}

/// Commands for every enabled stage, in physical stage order.
///
/// An empty result means no stage is armed; callers treat that as a no-op.
pub fn build_start_commands(job: &JobConfig) -> Vec<StartCommand> {
    job.indexed_stages()
        .filter(|(_, stage)| stage.enabled())
        .map(|(stage, config)| StartCommand {
            stage,
            payload: start_payload(config),
        })
        .collect()
}
