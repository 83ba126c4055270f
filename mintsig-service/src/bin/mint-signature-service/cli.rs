use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mint-signature-service")]
#[command(about = "Mint-request signing and reconciliation service", long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to mintsig.toml in the data dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Data directory for storage and the default config location
    #[arg(short, long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
