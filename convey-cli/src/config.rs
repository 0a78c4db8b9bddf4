//! Startup configuration: command-line flags with environment fallbacks

use std::path::PathBuf;
use clap::Parser;
use tracing::Level;

/// Serve unit conversions as JSON lines on stdin/stdout
///
/// Flags win over environment variables, which win over defaults.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "convey")]
#[command(version, about = "Unit conversions over a user-defined rule graph")]
pub struct Config {
    /// Rule file, one `1 <unit> = <factor> <unit>` per line
    #[arg(long = "rules", env = "CONVEY_RULES", default_value = "units.txt", value_name = "PATH")]
    pub rules_path: PathBuf,

    /// Maximum log level written to stderr
    #[arg(long, env = "CONVEY_LOG", default_value = "info", value_name = "LEVEL")]
    pub log_level: Level,
}
