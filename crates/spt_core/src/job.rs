use std::fmt;
use std::str::FromStr;

use crate::stage::{StageConfig, ValidationError};

/// Number of physical polishing stages on the machine.
pub const STAGE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Material {
    #[default]
    Steel,
    Aluminum,
    Titanium,
    Kryptonite,
}

impl Material {
    pub const ALL: [Material; 4] = [
        Material::Steel,
        Material::Aluminum,
        Material::Titanium,
        Material::Kryptonite,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Material::Steel => "Steel",
            Material::Aluminum => "Aluminum",
            Material::Titanium => "Titanium",
            Material::Kryptonite => "Kryptonite",
        }
    }

    /// Exact match on the canonical name, as stored in presets.
    pub fn from_name(name: &str) -> Option<Material> {
        Material::ALL.into_iter().find(|material| material.as_str() == name)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Lenient parse for operator input: surrounding whitespace and case are ignored.
impl FromStr for Material {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Material::ALL
            .into_iter()
            .find(|material| material.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| ValidationError::UnknownMaterial(raw.to_string()))
    }
}

/// Full job configuration: material, batch label and one config per stage.
///
/// Stages are addressed by their 1-based physical position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobConfig {
    pub material: Material,
    pub batch: String,
    stages: [StageConfig; STAGE_COUNT],
}

impl JobConfig {
    pub fn new(material: Material, batch: impl Into<String>, stages: [StageConfig; STAGE_COUNT]) -> Self {
        Self {
            material,
            batch: batch.into(),
            stages,
        }
    }

    pub fn stages(&self) -> &[StageConfig; STAGE_COUNT] {
        &self.stages
    }

    /// Iterates `(stage_index, config)` in physical order, starting at 1.
    pub fn indexed_stages(&self) -> impl Iterator<Item = (usize, &StageConfig)> {
        self.stages.iter().enumerate().map(|(i, stage)| (i + 1, stage))
    }

    pub fn stage(&self, index: usize) -> Result<&StageConfig, ValidationError> {
        index
            .checked_sub(1)
            .and_then(|slot| self.stages.get(slot))
            .ok_or(ValidationError::NoSuchStage(index))
    }

    pub fn stage_mut(&mut self, index: usize) -> Result<&mut StageConfig, ValidationError> {
        index
            .checked_sub(1)
            .and_then(|slot| self.stages.get_mut(slot))
            .ok_or(ValidationError::NoSuchStage(index))
    }

    pub fn enabled_count(&self) -> usize {
        self.stages.iter().filter(|stage| stage.enabled()).count()
    }
}
