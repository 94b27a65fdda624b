//! Command-line arguments.
//!
//! Without `--watch` or `--list` the binary opens the usage widget.

use crate::components::settings::Settings;
use crate::metrics::CpuMode;
use clap::{Parser, ValueEnum};

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "procwatch",
    about = "Watch CPU and memory usage of a process picked by name",
    version
)]
pub struct Args {
    /// Sample the named process in the terminal instead of opening the widget
    #[arg(short = 'w', long, value_name = "NAME")]
    pub watch: Option<String>,

    /// Print running process names, optionally only those starting with PREFIX, and exit
    #[arg(short = 'l', long, value_name = "PREFIX", num_args = 0..=1, default_missing_value = "")]
    pub list: Option<String>,

    /// Milliseconds between samples
    #[arg(short = 'i', long)]
    pub interval_ms: Option<u64>,

    /// How CPU usage is computed
    #[arg(long, value_enum)]
    pub cpu_mode: Option<CpuMode>,

    /// Stop watching after this many samples
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

impl Args {
    /// Default settings with the command-line overrides applied.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(ms) = self.interval_ms {
            settings.update_interval_ms = ms;
        }
        if let Some(mode) = self.cpu_mode {
            settings.cpu_mode = mode;
        }
        settings
    }
}
