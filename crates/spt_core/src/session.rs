use std::fmt;
use std::sync::Arc;

use spt_logging::{spt_debug, spt_info, spt_warn};

use crate::channel::MessageChannel;
use crate::command::{build_start_commands, COMMAND_TOPIC, LOG_TOPIC};
use crate::job::{JobConfig, Material};
use crate::operator_log::{LogAggregator, LogSettings};
use crate::preset::{self, DecodeError, EncodeError, PresetFormat};
use crate::stage::{Program, ValidationError};
use crate::view_model::{ConsoleViewModel, StageRowView};

/// Outcome of one start action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartReport {
    pub sent: usize,
    pub failed: usize,
}

impl StartReport {
    /// No stage was armed, so nothing was attempted.
    pub fn is_noop(&self) -> bool {
        self.sent == 0 && self.failed == 0
    }
}

/// Everything one console session reads and writes.
///
/// Job configuration is only changed through `&mut self`, so a preset load is
/// observed either entirely or not at all. The log is shared with the channel's
/// delivery context and synchronizes internally.
pub struct SessionState {
    job: JobConfig,
    log: Arc<LogAggregator>,
    channel: Arc<dyn MessageChannel>,
    dirty: bool,
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("job", &self.job)
            .field("log_len", &self.log.len())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl SessionState {
    /// Creates a session with default job values and subscribes the log to
    /// the controller's log topic.
    pub fn new(channel: Arc<dyn MessageChannel>, log_settings: LogSettings) -> Self {
        let log = Arc::new(LogAggregator::new(log_settings));
        let sink = Arc::clone(&log);
        channel.subscribe(
            LOG_TOPIC,
            Box::new(move |payload| {
                sink.on_remote(payload);
            }),
        );
        Self {
            job: JobConfig::default(),
            log,
            channel,
            dirty: true,
        }
    }

    pub fn job(&self) -> &JobConfig {
        &self.job
    }

    pub fn log(&self) -> &LogAggregator {
        &self.log
    }

    pub fn set_material(&mut self, material: Material) {
        if self.job.material != material {
            self.job.material = material;
            self.mark_dirty();
        }
    }

    pub fn set_batch(&mut self, batch: impl Into<String>) {
        let batch = batch.into();
        if self.job.batch != batch {
            self.job.batch = batch;
            self.mark_dirty();
        }
    }

    /// Flips the run toggle of a stage and returns the new state.
    pub fn toggle_stage(&mut self, stage: usize) -> Result<bool, ValidationError> {
        let enabled = self.job.stage_mut(stage)?.toggle();
        self.mark_dirty();
        Ok(enabled)
    }

    pub fn set_stage_enabled(&mut self, stage: usize, enabled: bool) -> Result<(), ValidationError> {
        self.job.stage_mut(stage)?.set_enabled(enabled);
        self.mark_dirty();
        Ok(())
    }

    pub fn set_program(&mut self, stage: usize, program: Program) -> Result<(), ValidationError> {
        self.job.stage_mut(stage)?.set_program(program);
        self.mark_dirty();
        Ok(())
    }

    pub fn set_speed(&mut self, stage: usize, speed_hz: i64) -> Result<(), ValidationError> {
        self.job.stage_mut(stage)?.set_speed_hz(speed_hz)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn set_cycles(&mut self, stage: usize, cycles: i64) -> Result<(), ValidationError> {
        self.job.stage_mut(stage)?.set_cycles(cycles)?;
        self.mark_dirty();
        Ok(())
    }

    /// Publishes a start command for every armed stage. A failed publish is
    /// logged and does not stop the remaining stages.
    pub fn start_polishing(&mut self) -> StartReport {
        let commands = build_start_commands(&self.job);
        if commands.is_empty() {
            spt_debug!("Start requested with no armed stages");
            return StartReport::default();
        }

        let mut report = StartReport::default();
        for command in commands {
            match self.channel.publish(COMMAND_TOPIC, &command.payload) {
                Ok(()) => {
                    spt_info!("Stage {} sent {}", command.stage, command.payload);
                    self.log.append_local(format!("Sent: {}", command.payload));
                    report.sent += 1;
                }
                Err(err) => {
                    spt_warn!("Stage {} publish failed: {}", command.stage, err);
                    self.log.append_local(format!("MQTT publish error: {err}"));
                    report.failed += 1;
                }
            }
        }
        self.mark_dirty();
        report
    }

    pub fn save_preset(&self, format: PresetFormat) -> Result<Vec<u8>, EncodeError> {
        preset::encode(&self.job, format)
    }

    /// Replaces the whole job configuration on success; on error the current
    /// configuration is left untouched.
    pub fn load_preset(&mut self, bytes: &[u8], format: PresetFormat) -> Result<(), DecodeError> {
        let job = preset::decode(bytes, format)?;
        self.job = job;
        self.mark_dirty();
        Ok(())
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.mark_dirty();
    }

    pub fn view(&self) -> ConsoleViewModel {
        ConsoleViewModel {
            material: self.job.material,
            batch: self.job.batch.clone(),
            stages: self
                .job
                .indexed_stages()
                .map(|(index, stage)| StageRowView {
                    index,
                    program: stage.program(),
                    speed_hz: stage.speed_hz(),
                    cycles: stage.cycles(),
                    enabled: stage.enabled(),
                })
                .collect(),
            armed_stages: self.job.enabled_count(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
