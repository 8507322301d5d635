use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tick", about = concat!("[x] tickoff v", env!("CARGO_PKG_VERSION"), " - a small to-do list"), version)]
pub struct Cli {
    /// Directory holding the saved task list
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/tickoff/config.toml)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "tickoff=trace"
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}
