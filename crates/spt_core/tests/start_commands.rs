use spt_core::{build_start_commands, JobConfig, Material, Program, StageConfig, StartCommand};

fn job(stages: [(Program, u32, u32, bool); 3]) -> JobConfig {
    let [a, b, c] = stages.map(|(program, speed, cycles, enabled)| {
        StageConfig::new(program, speed, cycles, enabled).unwrap()
    });
    JobConfig::new(Material::Steel, "", [a, b, c])
}

#[test]
fn command_uses_fixed_wire_format() {
    let commands = build_start_commands(&job([
        (Program::P1, 10_000, 1, false),
        (Program::P2, 15_000, 7, true),
        (Program::P1, 10_000, 1, false),
    ]));
    assert_eq!(
        commands,
        vec![StartCommand {
            stage: 2,
            payload: "START:P2,15000,7".to_string(),
        }]
    );
}

#[test]
fn only_enabled_stages_are_included() {
    let input = job([
        (Program::P3, 2_000, 5, true),
        (Program::P2, 3_000, 6, false),
        (Program::P1, 4_000, 7, true),
    ]);
    let commands = build_start_commands(&input);
    assert_eq!(commands.len(), input.enabled_count());
    assert!(commands.iter().all(|command| command.stage != 2));
}

#[test]
fn stage_order_is_preserved() {
    let commands = build_start_commands(&job([
        (Program::P3, 40_000, 50, true),
        (Program::P2, 1_000, 1, true),
        (Program::P1, 20_000, 25, true),
    ]));
    let stages: Vec<_> = commands.iter().map(|c| c.stage).collect();
    assert_eq!(stages, vec![1, 2, 3]);
    let payloads: Vec<_> = commands.iter().map(|c| c.payload.as_str()).collect();
    assert_eq!(
        payloads,
        vec!["START:P3,40000,50", "START:P2,1000,1", "START:P1,20000,25"]
    );
}

#[test]
fn nothing_enabled_yields_no_commands() {
    assert!(build_start_commands(&JobConfig::default()).is_empty());
}

#[test]
fn output_is_deterministic() {
    let input = job([
        (Program::P1, 10_000, 3, true),
        (Program::P2, 10_000, 3, true),
        (Program::P3, 10_000, 3, false),
    ]);
    assert_eq!(build_start_commands(&input), build_start_commands(&input));
}
