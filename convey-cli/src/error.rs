//! CLI errors and the structured error report sent back to clients

use std::path::PathBuf;
use convey_units::UnitError;
use serde::Serialize;
use thiserror::Error;

/// Protocol-level error codes, in addition to [`convey_units::codes`]
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const UNKNOWN_METHOD: &str = "UNKNOWN_METHOD";
    pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
}

/// Startup failures. These end the process.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read rules from {path}: {source}")]
    ReadRules {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Units(#[from] UnitError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error payload of a response line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorReport {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn parse_error(details: impl std::fmt::Display) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details))
            .with_suggestion("Send one JSON object per line")
    }

    pub fn unknown_method(method: &str) -> Self {
        Self::new(codes::UNKNOWN_METHOD, format!("Unknown method: {}", method))
            .with_suggestion("Use convert, add, sub, compare, path, parse, units or rules")
    }

    pub fn invalid_params(details: impl std::fmt::Display) -> Self {
        Self::new(codes::INVALID_PARAMS, format!("Invalid params: {}", details))
    }
}

impl From<UnitError> for ErrorReport {
    fn from(err: UnitError) -> Self {
        let report = ErrorReport::new(err.code(), err.to_string());
        match err {
            UnitError::UnknownUnit(_) => report.with_suggestion("Use the units method to list registered units"),
            UnitError::NoConversionPath { .. } => report.with_suggestion("Add a rule linking the two units"),
            UnitError::MalformedInput(_) => report.with_suggestion("Write quantities as <value>[<unit>], e.g. 3[hour]"),
            UnitError::MalformedRule { .. } => report,
        }
    }
}
