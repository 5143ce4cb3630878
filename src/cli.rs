use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Default)]
#[command(name = "ping-tui")]
#[command(author = "Anurag Ambuj")]
#[command(version)]
#[command(about = "Live latency charts for a set of hosts", long_about = None)]
pub struct Cli {
    #[arg(help = "Hosts to monitor (hostname or IP address)")]
    pub hosts: Vec<String>,

    #[arg(
        short = 'i',
        long,
        help = "Probe interval per host (e.g. 500ms, 1s, 2s)",
        value_parser = parse_duration
    )]
    pub interval: Option<Duration>,

    #[arg(
        short = 't',
        long,
        help = "Probe timeout (e.g. 1s, 2000ms)",
        value_parser = parse_duration
    )]
    pub timeout: Option<Duration>,

    #[arg(long, help = "Chart redraw interval (e.g. 800ms)", value_parser = parse_duration)]
    pub render_interval: Option<Duration>,

    #[arg(long, help = "Samples kept per host")]
    pub history: Option<usize>,

    #[arg(short = 'w', long, help = "Maximum probes in flight at once")]
    pub workers: Option<usize>,

    #[arg(
        short = 'c',
        long,
        help = "Path to configuration file",
        env = "PING_TUI_CONFIG"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Write logs to this file instead of the default location")]
    pub log_file: Option<PathBuf>,
}

fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}
