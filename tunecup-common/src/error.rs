//! Common error types for tunecup

use thiserror::Error;

/// Common result type for tunecup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the tunecup crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV store file lacks one of the record's columns
    #[error("Missing column '{column}' in {file}")]
    MissingColumn { column: &'static str, file: String },

    /// TOML configuration could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A store could not read its backing collection at construction
    #[error("Failed to load {store} records: {reason}")]
    Load { store: &'static str, reason: String },

    /// A mutation could not be written back; the in-memory change was undone
    #[error("Failed to persist {store} records: {reason}")]
    Persist { store: &'static str, reason: String },
}
