use spt_core::{ConsoleViewModel, LogEntry, LogOrigin, Severity, StageRowView};

pub fn render(view: &ConsoleViewModel) -> Vec<String> {
    let batch = if view.batch.is_empty() {
        "(none)"
    } else {
        view.batch.as_str()
    };

    let mut lines = Vec::with_capacity(view.stages.len() + 2);
    lines.push(format!(
        "Material: {} | Batch: {} | Armed: {}/{}",
        view.material,
        batch,
        view.armed_stages,
        view.stages.len()
    ));
    lines.push(format!(
        "{:<6} {:<8} {:<8} {:>11} {:>7}",
        "Stage", "Run", "Program", "Speed (Hz)", "Cycles"
    ));
    lines.extend(view.stages.iter().map(format_stage_row));
    lines
}

fn format_stage_row(stage: &StageRowView) -> String {
    format!(
        "{:<6} {:<8} {:<8} {:>11} {:>7}",
        stage.index,
        stage.run_label(),
        stage.program,
        format_with_commas(u64::from(stage.speed_hz)),
        stage.cycles
    )
}

pub fn format_log_entry(entry: &LogEntry) -> String {
    let source = match entry.origin {
        LogOrigin::Local => "console",
        LogOrigin::Remote => "machine",
    };
    format!("[{source}] {}", entry.text)
}

pub fn format_notice(severity: Severity, text: &str) -> String {
    match severity {
        Severity::Info => text.to_string(),
        Severity::Success => format!("ok: {text}"),
        Severity::Warning => format!("warning: {text}"),
        Severity::Error => format!("error: {text}"),
    }
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
