use crate::{Material, PresetFormat, Program};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator picked a material.
    MaterialSelected(Material),
    /// Operator edited the batch label.
    BatchChanged(String),
    /// Operator pressed a stage's Run toggle.
    StageToggled { stage: usize },
    ProgramSelected { stage: usize, program: Program },
    SpeedChanged { stage: usize, speed_hz: i64 },
    CyclesChanged { stage: usize, cycles: i64 },
    /// Operator pressed Start Polishing.
    StartClicked,
    /// Operator asked to store the current job under `name`.
    SavePresetRequested { name: String, format: PresetFormat },
    /// The shell read a stored preset and hands over its raw bytes.
    PresetLoaded {
        name: String,
        contents: Vec<u8>,
        format: PresetFormat,
    },
    /// Operator pressed Clear Log.
    ClearLogClicked,
    /// Render tick; lets the shell pick up remote log lines.
    Tick,
    NoOp,
}
