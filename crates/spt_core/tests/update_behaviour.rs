mod support;

use spt_core::{update, Effect, Material, Msg, PresetFormat, Program, SessionState, Severity};
use support::{init_logging, log_texts, session_with, ScriptedChannel};

fn apply(state: SessionState, msgs: Vec<Msg>) -> (SessionState, Vec<Effect>) {
    let mut state = state;
    let mut all = Vec::new();
    for msg in msgs {
        let (next, effects) = update(state, msg);
        state = next;
        all.extend(effects);
    }
    (state, all)
}

fn severities(effects: &[Effect]) -> Vec<Severity> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Notify { severity, .. } => Some(*severity),
            _ => None,
        })
        .collect()
}

#[test]
fn edits_update_view_without_effects() {
    init_logging();
    let channel = ScriptedChannel::new();
    let (state, effects) = apply(
        session_with(&channel),
        vec![
            Msg::MaterialSelected(Material::Titanium),
            Msg::BatchChanged("B-12".to_string()),
            Msg::StageToggled { stage: 2 },
            Msg::ProgramSelected {
                stage: 2,
                program: Program::P3,
            },
            Msg::SpeedChanged {
                stage: 2,
                speed_hz: 12_500,
            },
            Msg::CyclesChanged {
                stage: 2,
                cycles: 9,
            },
        ],
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.material, Material::Titanium);
    assert_eq!(view.batch, "B-12");
    assert_eq!(view.armed_stages, 1);
    let row = &view.stages[1];
    assert_eq!(
        (row.index, row.program, row.speed_hz, row.cycles, row.enabled),
        (2, Program::P3, 12_500, 9, true)
    );
    assert_eq!(row.run_label(), "Running");
    assert_eq!(view.stages[0].run_label(), "Run");
}

#[test]
fn rejected_edit_warns_and_keeps_value() {
    init_logging();
    let channel = ScriptedChannel::new();
    let (mut state, _) = apply(session_with(&channel), vec![Msg::Tick]);
    assert!(state.consume_dirty());

    let (mut state, effects) = update(
        state,
        Msg::SpeedChanged {
            stage: 1,
            speed_hz: 99_999,
        },
    );

    assert_eq!(severities(&effects), vec![Severity::Warning]);
    assert_eq!(state.view().stages[0].speed_hz, 10_000);
    assert!(!state.consume_dirty());
}

#[test]
fn start_reports_success_and_noop() {
    init_logging();
    let channel = ScriptedChannel::new();
    let (state, effects) = update(session_with(&channel), Msg::StartClicked);
    assert_eq!(severities(&effects), vec![Severity::Info]);

    let (state, effects) = apply(
        state,
        vec![Msg::StageToggled { stage: 1 }, Msg::StartClicked],
    );
    assert_eq!(
        effects,
        vec![Effect::Notify {
            severity: Severity::Success,
            text: "Commands published.".to_string(),
        }]
    );
    assert_eq!(log_texts(&state), vec!["Sent: START:P1,10000,1"]);
}

#[test]
fn start_with_failures_warns() {
    init_logging();
    let channel = ScriptedChannel::failing_on(&[1]);
    let (_state, effects) = apply(
        session_with(&channel),
        vec![
            Msg::StageToggled { stage: 1 },
            Msg::StageToggled { stage: 3 },
            Msg::StartClicked,
        ],
    );
    assert_eq!(severities(&effects), vec![Severity::Warning]);
}

#[test]
fn save_then_load_round_trips_through_effects() {
    init_logging();
    let channel = ScriptedChannel::new();
    let (state, effects) = apply(
        session_with(&channel),
        vec![
            Msg::MaterialSelected(Material::Aluminum),
            Msg::StageToggled { stage: 3 },
            Msg::SavePresetRequested {
                name: "aluminum".to_string(),
                format: PresetFormat::Ron,
            },
        ],
    );
    let saved = state.job().clone();
    let contents = match effects.as_slice() {
        [Effect::WritePreset {
            name,
            format: PresetFormat::Ron,
            contents,
        }] if name == "aluminum" => contents.clone(),
        other => panic!("unexpected effects {other:?}"),
    };

    let (state, effects) = apply(
        state,
        vec![
            Msg::MaterialSelected(Material::Steel),
            Msg::StageToggled { stage: 3 },
            Msg::PresetLoaded {
                name: "aluminum".to_string(),
                contents,
                format: PresetFormat::Ron,
            },
        ],
    );
    assert_eq!(severities(&effects), vec![Severity::Success]);
    assert_eq!(state.job(), &saved);
}

#[test]
fn broken_preset_reports_error_and_keeps_job() {
    init_logging();
    let channel = ScriptedChannel::new();
    let (state, _) = apply(
        session_with(&channel),
        vec![Msg::MaterialSelected(Material::Kryptonite)],
    );
    let before = state.job().clone();

    let (state, effects) = update(
        state,
        Msg::PresetLoaded {
            name: "broken".to_string(),
            contents: b"(version: 1)".to_vec(),
            format: PresetFormat::Ron,
        },
    );

    assert_eq!(severities(&effects), vec![Severity::Error]);
    assert_eq!(state.job(), &before);
}

#[test]
fn clear_log_message_empties_local_entries() {
    init_logging();
    let channel = ScriptedChannel::new();
    let (state, _) = apply(
        session_with(&channel),
        vec![
            Msg::StageToggled { stage: 2 },
            Msg::StartClicked,
            Msg::ClearLogClicked,
        ],
    );
    assert!(state.log().is_empty());
}
