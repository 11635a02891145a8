use std::path::PathBuf;

use clap::Parser;

/// Timbre voice-clone server
#[derive(Debug, Parser)]
#[command(name = "timbred", about = "Voice-clone speech synthesis server")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "timbre.toml", env = "TIMBRE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "TIMBRE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Log at debug level (includes per-request detail)
    #[arg(short, long)]
    pub verbose: bool,
}
