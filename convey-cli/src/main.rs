//! Convey CLI
//!
//! Loads conversion rules (`1 hour = 60 min`, one per line) and answers
//! JSON-lines requests on stdin:
//! - convert: express a quantity in another unit
//! - add / sub: combine two quantities in the left operand's unit
//! - compare: equal / less / greater, with tolerance
//! - path: the chain of units a conversion goes through
//! - parse: read a stream of quantity entries
//! - units / rules: inspect the registry
//!
//! Logs go to stderr; stdout carries responses only.

mod config;
mod error;
mod protocol;

use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use clap::Parser;
use convey_units::ConversionRegistry;
use tracing::{debug, error, info, warn};
use crate::config::Config;
use crate::error::{CliError, ErrorReport};
use crate::protocol::{handle_request, Request, Response};

fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(config.log_level)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "convey stopped");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), CliError> {
    let registry = load_registry(config)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        units = registry.len(),
        "ready, waiting for requests"
    );

    let stdin = io::stdin();
    serve(&registry, stdin.lock(), io::stdout())
}

fn load_registry(config: &Config) -> Result<ConversionRegistry, CliError> {
    let text = fs::read_to_string(&config.rules_path).map_err(|source| CliError::ReadRules {
        path: config.rules_path.clone(),
        source,
    })?;
    let mut registry = ConversionRegistry::new();
    let applied = registry.load_rules(&text)?;
    info!(path = %config.rules_path.display(), rules = applied, "rules loaded");
    Ok(registry)
}

/// Answer requests until EOF
fn serve<R: BufRead, W: Write>(registry: &ConversionRegistry, mut reader: R, mut writer: W) -> Result<(), CliError> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            info!("client disconnected (EOF)");
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(trimmed) {
            Ok(request) => {
                debug!(method = %request.method, "processing");
                handle_request(registry, &request)
            }
            Err(e) => {
                warn!(error = %e, "unparseable request");
                Response::err(None, ErrorReport::parse_error(e))
            }
        };

        serde_json::to_writer(&mut writer, &response)?;
        writeln!(writer)?;
        writer.flush()?;
    }
}
