//! Preset documents: a portable snapshot of a [`JobConfig`].
//!
//! The canonical encoding is pretty-printed RON; JSON with the same shape is
//! accepted for interchange. Encoding is deterministic. Decoding either yields
//! a fully validated `JobConfig` or an error, never a partial result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::job::{JobConfig, Material, STAGE_COUNT};
use crate::stage::{StageConfig, StageDraft, ValidationError};

/// Document layout version written by [`encode`].
pub const PRESET_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresetFormat {
    #[default]
    Ron,
    Json,
}

impl PresetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            PresetFormat::Ron => "ron",
            PresetFormat::Json => "json",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ron" => Some(PresetFormat::Ron),
            "json" => Some(PresetFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed preset: {0}")]
    MalformedShape(String),
    #[error("invalid preset field in {location}: {source}")]
    InvalidField {
        location: String,
        #[source]
        source: ValidationError,
    },
    #[error("unsupported preset version {found} (expected {expected})", expected = PRESET_VERSION)]
    UnsupportedVersion { found: u32 },
}

#[derive(Debug, Error)]
#[error("failed to encode preset: {0}")]
pub struct EncodeError(String);

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PresetDocument {
    version: u32,
    material: String,
    batch: String,
    stages: Vec<StageDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StageDocument {
    program: String,
    #[serde(rename = "speedHz")]
    speed_hz: i64,
    cycles: i64,
    enabled: bool,
}

impl From<&StageConfig> for StageDocument {
    fn from(stage: &StageConfig) -> Self {
        let draft = stage.to_draft();
        Self {
            program: draft.program,
            speed_hz: draft.speed_hz,
            cycles: draft.cycles,
            enabled: draft.enabled,
        }
    }
}

pub fn encode(job: &JobConfig, format: PresetFormat) -> Result<Vec<u8>, EncodeError> {
    let document = PresetDocument {
        version: PRESET_VERSION,
        material: job.material.as_str().to_string(),
        batch: job.batch.clone(),
        stages: job.stages().iter().map(StageDocument::from).collect(),
    };

    match format {
        PresetFormat::Ron => {
            let pretty = ron::ser::PrettyConfig::new();
            ron::ser::to_string_pretty(&document, pretty)
                .map(String::into_bytes)
                .map_err(|err| EncodeError(err.to_string()))
        }
        PresetFormat::Json => {
            serde_json::to_vec_pretty(&document).map_err(|err| EncodeError(err.to_string()))
        }
    }
}

pub fn decode(bytes: &[u8], format: PresetFormat) -> Result<JobConfig, DecodeError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|err| DecodeError::MalformedShape(format!("not UTF-8 text: {err}")))?;

    let document: PresetDocument = match format {
        PresetFormat::Ron => {
            ron::from_str(text).map_err(|err| DecodeError::MalformedShape(err.to_string()))?
        }
        PresetFormat::Json => serde_json::from_str(text)
            .map_err(|err| DecodeError::MalformedShape(err.to_string()))?,
    };

    if document.version != PRESET_VERSION {
        return Err(DecodeError::UnsupportedVersion {
            found: document.version,
        });
    }
    if document.stages.len() != STAGE_COUNT {
        return Err(DecodeError::MalformedShape(format!(
            "expected {STAGE_COUNT} stages, found {}",
            document.stages.len()
        )));
    }

    let material = Material::from_name(&document.material).ok_or_else(|| {
        DecodeError::InvalidField {
            location: "material".to_string(),
            source: ValidationError::UnknownMaterial(document.material.clone()),
        }
    })?;

    let mut stages = [StageConfig::default(); STAGE_COUNT];
    for (slot, (stage, raw)) in stages.iter_mut().zip(document.stages).enumerate() {
        let draft = StageDraft {
            program: raw.program,
            speed_hz: raw.speed_hz,
            cycles: raw.cycles,
            enabled: raw.enabled,
        };
        *stage = draft.validate().map_err(|source| DecodeError::InvalidField {
            location: format!("stage {}", slot + 1),
            source,
        })?;
    }

    Ok(JobConfig::new(material, document.batch, stages))
}
