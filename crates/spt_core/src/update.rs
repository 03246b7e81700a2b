use spt_logging::{spt_debug, spt_warn};

use crate::effect::Severity;
use crate::{Effect, Msg, SessionState, ValidationError};

/// Applies an operator intent to the session and returns what the shell must do.
///
/// Rejected edits leave the session unchanged and produce a warning.
pub fn update(mut state: SessionState, msg: Msg) -> (SessionState, Vec<Effect>) {
    let effects = match msg {
        Msg::MaterialSelected(material) => {
            state.set_material(material);
            Vec::new()
        }
        Msg::BatchChanged(batch) => {
            state.set_batch(batch);
            Vec::new()
        }
        Msg::StageToggled { stage } => edit_result(state.toggle_stage(stage).map(|_| ())),
        Msg::ProgramSelected { stage, program } => edit_result(state.set_program(stage, program)),
        Msg::SpeedChanged { stage, speed_hz } => edit_result(state.set_speed(stage, speed_hz)),
        Msg::CyclesChanged { stage, cycles } => edit_result(state.set_cycles(stage, cycles)),
        Msg::StartClicked => {
            let report = state.start_polishing();
            if report.is_noop() {
                vec![Effect::notify(
                    Severity::Info,
                    "No stage is armed; nothing was sent.",
                )]
            } else if report.failed == 0 {
                vec![Effect::notify(Severity::Success, "Commands published.")]
            } else {
                vec![Effect::notify(
                    Severity::Warning,
                    format!(
                        "Commands published with {} error(s); {} sent.",
                        report.failed, report.sent
                    ),
                )]
            }
        }
        Msg::SavePresetRequested { name, format } => match state.save_preset(format) {
            Ok(contents) => vec![Effect::WritePreset {
                name,
                format,
                contents,
            }],
            Err(err) => {
                spt_warn!("Preset {:?} could not be encoded: {}", name, err);
                vec![Effect::notify(Severity::Error, err.to_string())]
            }
        },
        Msg::PresetLoaded {
            name,
            contents,
            format,
        } => match state.load_preset(&contents, format) {
            Ok(()) => vec![Effect::notify(
                Severity::Success,
                format!("Preset '{name}' loaded."),
            )],
            Err(err) => {
                spt_warn!("Preset {:?} rejected: {}", name, err);
                vec![Effect::notify(
                    Severity::Error,
                    format!("Preset '{name}' not loaded: {err}"),
                )]
            }
        },
        Msg::ClearLogClicked => {
            state.clear_log();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn edit_result(result: Result<(), ValidationError>) -> Vec<Effect> {
    match result {
        Ok(()) => Vec::new(),
        Err(err) => {
            spt_debug!("Edit rejected: {}", err);
            vec![Effect::notify(Severity::Warning, format!("Rejected: {err}"))]
        }
    }
}
