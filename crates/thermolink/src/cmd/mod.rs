use clap::{Args, Subcommand, ValueEnum};
use thermolink_protocol::CamMessage;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod ports;
pub mod tune;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch a port and print decoded camera events.
    Watch(WatchArgs),
    /// Encode and send tuning parameters to the device.
    Tune(TuneArgs),
    /// List serial ports visible to the platform.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args, format),
        Command::Tune(args) => tune::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Decoded event kinds, for `--only` filtering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EventKind {
    Image,
    Log,
    Timings,
    Analysis,
}

impl EventKind {
    /// The kind string this filter selects, as reported by [`CamMessage::kind`].
    pub fn as_kind(self) -> &'static str {
        match self {
            EventKind::Image => "image",
            EventKind::Log => "log",
            EventKind::Timings => "timings",
            EventKind::Analysis => "analysis",
        }
    }

    pub fn matches(self, msg: &CamMessage) -> bool {
        self.as_kind() == msg.kind()
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Serial port path (e.g. /dev/ttyUSB0).
    pub port: String,
    /// Baud rate.
    #[arg(long, default_value_t = thermolink_serial::DEFAULT_BAUD)]
    pub baud: u32,
    /// Pulse RTS/DTR to reset the device before reading.
    #[arg(long)]
    pub reset: bool,
    /// Filter to specific event kinds (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<EventKind>>,
    /// Exit after printing N events.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct TuneArgs {
    /// Serial port path (e.g. /dev/ttyUSB0).
    pub port: String,
    /// Baud rate.
    #[arg(long, default_value_t = thermolink_serial::DEFAULT_BAUD)]
    pub baud: u32,
    /// Lower temperature threshold (°C).
    #[arg(long, default_value_t = 27.0)]
    pub tmin: f32,
    /// Ambient minimum threshold (°C).
    #[arg(long, default_value_t = 100.0)]
    pub tamb_min: f32,
    /// Upper temperature threshold (°C).
    #[arg(long, default_value_t = 40.0)]
    pub tmax: f32,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
