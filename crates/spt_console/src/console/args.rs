use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use spt_core::{LogSettings, REMOTE_LOG_CAPACITY};
use spt_link::{Credentials, LinkSettings};
use spt_logging::{LogDestination, DEFAULT_LOG_FILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

/// Operator console for the multiscale SMART SPT polisher.
#[derive(Debug, Parser)]
#[command(name = "spt_console", version)]
pub struct Args {
    /// MQTT broker host.
    #[arg(long, env = "MQTT_BROKER", default_value = "192.168.1.228")]
    pub broker: String,

    /// MQTT broker port.
    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    pub port: u16,

    #[arg(long, env = "MQTT_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "MQTT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Directory holding saved presets.
    #[arg(long, default_value = "presets")]
    pub presets_dir: PathBuf,

    /// Number of controller log lines kept in the log view.
    #[arg(long, default_value_t = REMOTE_LOG_CAPACITY)]
    pub remote_log_capacity: usize,

    /// Use an in-process loopback channel instead of the broker.
    #[arg(long)]
    pub offline: bool,

    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log_to: LogTarget,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings {
            broker_host: self.broker.clone(),
            broker_port: self.port,
            credentials: self.username.as_ref().map(|username| Credentials {
                username: username.clone(),
                password: self.password.clone().unwrap_or_default(),
            }),
            ..LinkSettings::default()
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            remote_capacity: self.remote_log_capacity,
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log_to {
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
        }
    }
}
