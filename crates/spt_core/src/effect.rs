use crate::PresetFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a one-line message to the operator.
    Notify { severity: Severity, text: String },
    /// Persist an encoded preset under `name`.
    WritePreset {
        name: String,
        format: PresetFormat,
        contents: Vec<u8>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Effect {
    pub(crate) fn notify(severity: Severity, text: impl Into<String>) -> Self {
        Effect::Notify {
            severity,
            text: text.into(),
        }
    }
}
