//! Error types for RECON parsing and serialization.

use thiserror::Error;

/// Errors that can occur while parsing or serializing RECON.
#[derive(Error, Debug)]
pub enum ReconError {
    /// The input text was not well-formed RECON.
    /// `line` and `column` are 1-based; the column counts characters, not bytes.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// A record contains the same field name twice.
    #[error("duplicate field `{field}` at line {line}, column {column}")]
    DuplicateField {
        line: usize,
        column: usize,
        field: String,
    },

    /// The value cannot be represented in RECON (non-finite float, JSON null, ...).
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// JSON text handed to the bridge helpers was malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReconError {
    /// The `(line, column)` an input error was detected at, if it has one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            ReconError::Syntax { line, column, .. }
            | ReconError::DuplicateField { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

/// Convenience alias used throughout recon-core.
pub type Result<T> = std::result::Result<T, ReconError>;
