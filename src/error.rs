//! Centralized error handling for datasweep.
//!
//! Every fallible library operation returns [`Result`], an alias over
//! [`SweepError`]. The enum keeps failure categories pattern-matchable so a
//! front end can decide what is user-fixable (wrong file type, bad column
//! name) and what is not (engine failures, I/O).

use std::fmt;

/// Main error type for datasweep operations.
#[derive(Debug)]
pub enum SweepError {
    /// File extension is not one of the supported tabular formats.
    UnsupportedFormat {
        file_name: String,
        extension: String,
    },

    /// File content could not be parsed as the format its extension claims.
    Parse { file_name: String, message: String },

    /// A referenced column does not exist in the table.
    UnknownColumn { column: String },

    /// Output writer rejected the table content.
    Serialization(String),

    /// I/O errors (reading uploads, writing exports)
    Io(std::io::Error),

    /// Dataframe engine errors (Polars)
    Data(String),
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat {
                file_name,
                extension,
            } => {
                if extension.is_empty() {
                    write!(f, "Unsupported file type for '{file_name}' (no extension)")
                } else {
                    write!(f, "Unsupported file type for '{file_name}': '.{extension}'")
                }
            }
            Self::Parse { file_name, message } => {
                write!(f, "Failed to parse '{file_name}': {message}")
            }
            Self::UnknownColumn { column } => write!(f, "Unknown column '{column}'"),
            Self::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Data(msg) => write!(f, "Data processing error: {msg}"),
        }
    }
}

impl std::error::Error for SweepError {}

impl From<std::io::Error> for SweepError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<polars::error::PolarsError> for SweepError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::Data(err.to_string())
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON error: {err}"))
    }
}

impl From<rust_xlsxwriter::XlsxError> for SweepError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for datasweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;
