use std::path::PathBuf;

use clap::Parser;

/// Recital markdown-to-speech server
#[derive(Debug, Parser)]
#[command(name = "recital", about = "Convert markdown documents to speech audio")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "recital.toml", env = "RECITAL_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "RECITAL_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
