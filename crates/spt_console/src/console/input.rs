use spt_core::{Material, Msg, PresetFormat, Program, ValidationError};
use thiserror::Error;

/// One parsed operator line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    LoadPreset { name: String },
    ListPresets,
    Show,
    ShowLog,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command {0:?}; type 'help'")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0:?} is not a number")]
    NotANumber(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub const HELP: &[&str] = &[
    "material <Steel|Aluminum|Titanium|Kryptonite>",
    "batch [label]             set or clear the batch label",
    "run <stage>               toggle a stage's Run switch",
    "program <stage> <P1|P2|P3>",
    "speed <stage> <hz>        1000..=40000",
    "cycles <stage> <count>    1..=50",
    "start                     send START to every running stage",
    "save <name> [ron|json]    store the current job as a preset",
    "load <name>               restore a stored preset",
    "presets                   list stored presets",
    "clear                     clear console log entries",
    "show | log | help | quit",
];

/// Returns `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    let Some((word, rest)) = split_word(line) else {
        return Ok(None);
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "material" => {
            let name = single_arg(rest, "material <name>")?;
            Command::Dispatch(Msg::MaterialSelected(name.parse::<Material>()?))
        }
        "batch" => Command::Dispatch(Msg::BatchChanged(rest.to_string())),
        "run" => {
            let stage = stage_arg(single_arg(rest, "run <stage>")?)?;
            Command::Dispatch(Msg::StageToggled { stage })
        }
        "program" => {
            let (stage, value) = two_args(rest, "program <stage> <P1|P2|P3>")?;
            Command::Dispatch(Msg::ProgramSelected {
                stage: stage_arg(stage)?,
                program: value.parse::<Program>()?,
            })
        }
        "speed" => {
            let (stage, value) = two_args(rest, "speed <stage> <hz>")?;
            Command::Dispatch(Msg::SpeedChanged {
                stage: stage_arg(stage)?,
                speed_hz: number_arg(value)?,
            })
        }
        "cycles" => {
            let (stage, value) = two_args(rest, "cycles <stage> <count>")?;
            Command::Dispatch(Msg::CyclesChanged {
                stage: stage_arg(stage)?,
                cycles: number_arg(value)?,
            })
        }
        "start" => Command::Dispatch(Msg::StartClicked),
        "save" => {
            const USAGE: &str = "save <name> [ron|json]";
            let mut args = rest.split_whitespace();
            let name = args.next().ok_or(InputError::Usage(USAGE))?;
            let format = match args.next() {
                None => PresetFormat::Ron,
                Some(ext) => PresetFormat::from_extension(ext).ok_or(InputError::Usage(USAGE))?,
            };
            if args.next().is_some() {
                return Err(InputError::Usage(USAGE));
            }
            Command::Dispatch(Msg::SavePresetRequested {
                name: name.to_string(),
                format,
            })
        }
        "load" => Command::LoadPreset {
            name: single_arg(rest, "load <name>")?.to_string(),
        },
        "presets" => Command::ListPresets,
        "clear" => Command::Dispatch(Msg::ClearLogClicked),
        "show" => Command::Show,
        "log" => Command::ShowLog,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn split_word(line: &str) -> Option<(&str, &str)> {
    if line.is_empty() {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim())),
        None => Some((line, "")),
    }
}

fn single_arg<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, InputError> {
    let mut args = rest.split_whitespace();
    match (args.next(), args.next()) {
        (Some(arg), None) => Ok(arg),
        _ => Err(InputError::Usage(usage)),
    }
}

fn two_args<'a>(rest: &'a str, usage: &'static str) -> Result<(&'a str, &'a str), InputError> {
    let mut args = rest.split_whitespace();
    match (args.next(), args.next(), args.next()) {
        (Some(first), Some(second), None) => Ok((first, second)),
        _ => Err(InputError::Usage(usage)),
    }
}

fn number_arg(raw: &str) -> Result<i64, InputError> {
    raw.parse::<i64>()
        .map_err(|_| InputError::NotANumber(raw.to_string()))
}

fn stage_arg(raw: &str) -> Result<usize, InputError> {
    raw.parse::<usize>()
        .map_err(|_| InputError::NotANumber(raw.to_string()))
}
