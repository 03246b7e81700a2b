use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use thiserror::Error;

/// Allowed drive speed in Hz.
pub const SPEED_HZ_RANGE: RangeInclusive<u32> = 1_000..=40_000;
/// Allowed cycle count per start.
pub const CYCLES_RANGE: RangeInclusive<u32> = 1..=50;

pub const DEFAULT_SPEED_HZ: u32 = 10_000;
pub const DEFAULT_CYCLES: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("speed {value} Hz is outside {min}..={max}")]
    SpeedOutOfRange { value: i64, min: u32, max: u32 },
    #[error("cycle count {value} is outside {min}..={max}")]
    CyclesOutOfRange { value: i64, min: u32, max: u32 },
    #[error("unknown program {0:?}")]
    UnknownProgram(String),
    #[error("unknown material {0:?}")]
    UnknownMaterial(String),
    #[error("stage {0} does not exist")]
    NoSuchStage(usize),
}

/// Polishing routine run by a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Program {
    #[default]
    P1,
    P2,
    P3,
}

impl Program {
    pub const ALL: [Program; 3] = [Program::P1, Program::P2, Program::P3];

    pub fn as_str(self) -> &'static str {
        match self {
            Program::P1 => "P1",
            Program::P2 => "P2",
            Program::P3 => "P3",
        }
    }

    /// Exact match on the canonical name, as stored in presets.
    pub fn from_name(name: &str) -> Option<Program> {
        Program::ALL.into_iter().find(|program| program.as_str() == name)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Lenient parse for operator input: surrounding whitespace and case are ignored.
impl FromStr for Program {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Program::ALL
            .into_iter()
            .find(|program| program.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| ValidationError::UnknownProgram(raw.to_string()))
    }
}

/// Configuration of one polishing stage. Fields are only reachable through
/// [`StageDraft::validate`], so a `StageConfig` always holds in-range values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageConfig {
    program: Program,
    speed_hz: u32,
    cycles: u32,
    enabled: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            program: Program::P1,
            speed_hz: DEFAULT_SPEED_HZ,
            cycles: DEFAULT_CYCLES,
            enabled: false,
        }
    }
}

impl StageConfig {
    pub fn new(
        program: Program,
        speed_hz: u32,
        cycles: u32,
        enabled: bool,
    ) -> Result<Self, ValidationError> {
        StageDraft {
            program: program.as_str().to_string(),
            speed_hz: i64::from(speed_hz),
            cycles: i64::from(cycles),
            enabled,
        }
        .validate()
    }

    pub fn program(&self) -> Program {
        self.program
    }

    pub fn speed_hz(&self) -> u32 {
        self.speed_hz
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_program(&mut self, program: Program) {
        self.program = program;
    }

    /// Rejects out-of-range values and keeps the previous speed.
    pub fn set_speed_hz(&mut self, speed_hz: i64) -> Result<(), ValidationError> {
        let draft = StageDraft {
            speed_hz,
            ..self.to_draft()
        };
        *self = draft.validate()?;
        Ok(())
    }

    /// Rejects out-of-range values and keeps the previous cycle count.
    pub fn set_cycles(&mut self, cycles: i64) -> Result<(), ValidationError> {
        let draft = StageDraft {
            cycles,
            ..self.to_draft()
        };
        *self = draft.validate()?;
        Ok(())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn to_draft(&self) -> StageDraft {
        StageDraft {
            program: self.program.as_str().to_string(),
            speed_hz: i64::from(self.speed_hz),
            cycles: i64::from(self.cycles),
            enabled: self.enabled,
        }
    }
}

/// Unchecked stage values as they arrive from an edit or a preset document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDraft {
    pub program: String,
    pub speed_hz: i64,
    pub cycles: i64,
    pub enabled: bool,
}

impl StageDraft {
    pub fn validate(&self) -> Result<StageConfig, ValidationError> {
        let program = Program::from_name(&self.program)
            .ok_or_else(|| ValidationError::UnknownProgram(self.program.clone()))?;
        let speed_hz = checked_in_range(self.speed_hz, &SPEED_HZ_RANGE).ok_or(
            ValidationError::SpeedOutOfRange {
                value: self.speed_hz,
                min: *SPEED_HZ_RANGE.start(),
                max: *SPEED_HZ_RANGE.end(),
            },
        )?;
        let cycles = checked_in_range(self.cycles, &CYCLES_RANGE).ok_or(
            ValidationError::CyclesOutOfRange {
                value: self.cycles,
                min: *CYCLES_RANGE.start(),
                max: *CYCLES_RANGE.end(),
            },
        )?;
        Ok(StageConfig {
            program,
            speed_hz,
            cycles,
            enabled: self.enabled,
        })
    }
}

fn checked_in_range(value: i64, range: &RangeInclusive<u32>) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| range.contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_parses_case_insensitively() {
        assert_eq!("p2".parse::<Program>(), Ok(Program::P2));
        assert_eq!(" P3 ".parse::<Program>(), Ok(Program::P3));
        assert_eq!(
            "P4".parse::<Program>(),
            Err(ValidationError::UnknownProgram("P4".to_string()))
        );
    }

    #[test]
    fn drafts_need_the_exact_program_name() {
        let draft = StageDraft {
            program: " p2".to_string(),
            speed_hz: 10_000,
            cycles: 1,
            enabled: true,
        };
        assert_eq!(
            draft.validate(),
            Err(ValidationError::UnknownProgram(" p2".to_string()))
        );
    }

    #[test]
    fn negative_values_are_out_of_range() {
        assert_eq!(checked_in_range(-1, &CYCLES_RANGE), None);
        assert_eq!(checked_in_range(i64::MAX, &SPEED_HZ_RANGE), None);
        assert_eq!(checked_in_range(40_000, &SPEED_HZ_RANGE), Some(40_000));
    }
}
