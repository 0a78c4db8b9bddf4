//! Errors raised by registry lookups, conversions and parsing
//!
//! Every failure is surfaced immediately to the caller. Nothing is retried
//! or silently defaulted.

use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const NO_CONVERSION_PATH: &str = "NO_CONVERSION_PATH";
    pub const MALFORMED_INPUT: &str = "MALFORMED_INPUT";
}

/// Error type for unit operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// Unit identifier is not present in the registry
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// Both units are registered but no chain of conversions links them
    #[error("no conversion path from {from} to {to}")]
    NoConversionPath { from: String, to: String },

    /// Text did not match the quantity grammar
    #[error("malformed entry: {0}")]
    MalformedInput(String),

    /// Rule line did not match `1 <unit> = <scale> <unit>`
    #[error("malformed rule on line {line}: {text}")]
    MalformedRule { line: usize, text: String },
}

impl UnitError {
    pub fn unknown_unit(unit: impl Into<String>) -> Self {
        UnitError::UnknownUnit(unit.into())
    }

    pub fn no_path(from: impl Into<String>, to: impl Into<String>) -> Self {
        UnitError::NoConversionPath { from: from.into(), to: to.into() }
    }

    pub fn malformed(entry: impl Into<String>) -> Self {
        UnitError::MalformedInput(entry.into())
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            UnitError::UnknownUnit(_) => codes::UNKNOWN_UNIT,
            UnitError::NoConversionPath { .. } => codes::NO_CONVERSION_PATH,
            UnitError::MalformedInput(_) | UnitError::MalformedRule { .. } => codes::MALFORMED_INPUT,
        }
    }

    /// True for both flavours of grammar failure
    pub fn is_malformed(&self) -> bool {
        self.code() == codes::MALFORMED_INPUT
    }
}

pub type Result<T> = std::result::Result<T, UnitError>;
