//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "thermo",
    version,
    about = "Battery temperature alarm while charging"
)]
pub struct Cli {
    /// Path to config TOML; built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum UnitArg {
    #[value(alias = "c")]
    Celsius,
    #[value(alias = "f")]
    Fahrenheit,
}

impl From<UnitArg> for thermo_core::TempUnit {
    fn from(u: UnitArg) -> Self {
        match u {
            UnitArg::Celsius => Self::Celsius,
            UnitArg::Fahrenheit => Self::Fahrenheit,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the battery temperature and alarm when it crosses the limit
    Run {
        /// Replay readings from a CSV trace (headers: temperature,unit) instead of the simulator
        #[arg(long, value_name = "FILE")]
        trace: Option<PathBuf>,
        /// Override sampling.period_ms
        #[arg(long, value_name = "MS")]
        period_ms: Option<u64>,
        /// Initial limit text, interpreted in the active unit
        #[arg(long, value_name = "TEXT")]
        limit: Option<String>,
        /// Initial display unit
        #[arg(long, value_enum, value_name = "UNIT")]
        unit: Option<UnitArg>,
        /// Start with the simulated charger plugged in
        #[arg(long, action = ArgAction::SetTrue)]
        charging: bool,
        /// Stop after this many samples
        #[arg(long, value_name = "N")]
        max_samples: Option<u64>,
        /// Do not read interactive commands from stdin
        #[arg(
            long,
            action = ArgAction::SetTrue,
            long_help = "Do not read interactive commands from stdin.\n\nWithout this flag each stdin line is one command:\n  plug | unplug        connect or disconnect the simulated charger\n  battery <pct>        set the simulated battery level\n  limit <text>         replace the limit text\n  unit                 toggle Celsius/Fahrenheit (resets the limit)\n  drag <dx>            swipe in progress, dx pixels to the right\n  swipe <dx>           finished swipe; more than the dismiss distance dismisses\n  quit                 stop monitoring"
        )]
        no_input: bool,
    },
    /// Validate config and construct collaborators
    SelfCheck,
    /// Health check for operational monitoring
    Health,
}
