pub mod args;
mod effects;
mod input;
mod render;

use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use spt_core::{update, MessageChannel, Msg, SessionState, Severity};
use spt_link::{LoopbackChannel, MqttChannel, PresetStore};
use spt_logging::{spt_info, spt_warn};

use self::args::Args;
use self::effects::EffectRunner;
use self::input::{parse_line, Command, HELP};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

pub fn run_app(args: Args) -> anyhow::Result<()> {
    if !spt_logging::initialize(&args.log_destination(), args.log_level) {
        eprintln!("Logging could not be initialized; continuing without a log file.");
    }
    spt_info!("spt_console starting");

    let channel: Arc<dyn MessageChannel> = if args.offline {
        spt_info!("Running offline with a loopback channel");
        Arc::new(LoopbackChannel::new())
    } else {
        let settings = args.link_settings();
        let address = format!("{}:{}", settings.broker_host, settings.broker_port);
        Arc::new(
            MqttChannel::connect(settings)
                .with_context(|| format!("failed to start MQTT link to {address}"))?,
        )
    };

    let store = PresetStore::new(args.presets_dir.clone());
    let mut state = SessionState::new(channel, args.log_settings());
    let mut shell = Shell::new(EffectRunner::new(store), io::stdout());
    shell.print_lines(&render::render(&state.view()))?;
    state.consume_dirty();

    let lines = spawn_stdin_reader();
    loop {
        let line = match lines.recv_timeout(TICK_INTERVAL) {
            Ok(line) => line,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                state = shell.dispatch(state, Msg::Tick)?;
                shell.print_new_log_entries(&state)?;
                continue;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };

        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => state = shell.execute(state, command)?,
            Err(err) => shell.print_notice(Severity::Warning, &err.to_string())?,
        }
        shell.print_new_log_entries(&state)?;
    }

    spt_info!("spt_console exiting");
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    spt_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
    });
    rx
}

/// Terminal side of the console: runs effects, prints notices, redraws the
/// stage table and tails the operator log.
struct Shell<W: Write> {
    runner: EffectRunner,
    out: W,
    last_log_sequence: u64,
}

impl<W: Write> Shell<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            runner,
            out,
            last_log_sequence: 0,
        }
    }

    fn dispatch(&mut self, state: SessionState, msg: Msg) -> io::Result<SessionState> {
        let (mut state, effects) = update(state, msg);
        for (severity, text) in self.runner.run(effects) {
            self.print_notice(severity, &text)?;
        }
        if state.consume_dirty() {
            self.print_lines(&render::render(&state.view()))?;
        }
        Ok(state)
    }

    fn execute(&mut self, state: SessionState, command: Command) -> io::Result<SessionState> {
        match command {
            Command::Dispatch(msg) => return self.dispatch(state, msg),
            Command::LoadPreset { name } => match self.runner.read_preset(&name) {
                Ok(msg) => return self.dispatch(state, msg),
                Err(err) => self.print_notice(
                    Severity::Error,
                    &format!("Preset '{name}' not loaded: {err}"),
                )?,
            },
            Command::ListPresets => match self.runner.list_presets() {
                Ok(names) if names.is_empty() => {
                    self.print_notice(Severity::Info, "No presets saved.")?
                }
                Ok(names) => self.print_lines(&names)?,
                Err(err) => self.print_notice(Severity::Error, &err.to_string())?,
            },
            Command::Show => self.print_lines(&render::render(&state.view()))?,
            Command::ShowLog => {
                let entries = state.log().snapshot();
                let lines: Vec<String> = entries.iter().map(render::format_log_entry).collect();
                self.print_lines(&lines)?;
                // Entries arriving after the snapshot are left for the tail.
                if let Some(last) = entries.last() {
                    self.last_log_sequence = self.last_log_sequence.max(last.sequence);
                }
            }
            Command::Help => self.print_lines(HELP)?,
            Command::Quit => {}
        }
        Ok(state)
    }

    fn print_new_log_entries(&mut self, state: &SessionState) -> io::Result<()> {
        for entry in state.log().snapshot_after(self.last_log_sequence) {
            writeln!(self.out, "{}", render::format_log_entry(&entry))?;
            self.last_log_sequence = entry.sequence;
        }
        self.out.flush()
    }

    fn print_notice(&mut self, severity: Severity, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", render::format_notice(severity, text))?;
        self.out.flush()
    }

    fn print_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{}", line.as_ref())?;
        }
        self.out.flush()
    }
}
