use std::path::PathBuf;

use clap::Parser;

/// capbridge: a desktop host exposing a fixed capability bridge to its
/// renderer.
#[derive(Parser, Debug)]
#[command(name = "capbridge", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level directive (e.g. `debug` or `capbridge_ipc=trace`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Force dev mode (live renderer URL, dev tools, stderr-only logs).
    #[arg(long)]
    pub dev: bool,

    /// Serve the bridge as line-delimited JSON over stdin/stdout instead of
    /// opening a window.
    #[arg(long, conflicts_with = "print_bootstrap")]
    pub stdio: bool,

    /// Print the renderer bootstrap script for the configured install
    /// strategy and exit.
    #[arg(long)]
    pub print_bootstrap: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
