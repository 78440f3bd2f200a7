//! Error types for the fallible surfaces: table loading and history persistence
//!
//! The calculators themselves never fail. Bad or empty inputs produce a zero
//! result plus warnings instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading rate, bracket and cap tables
#[derive(Error, Debug)]
pub enum TableError {
    #[error("failed to open table {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} line {line}: invalid number {value:?}")]
    BadNumber {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("{path} line {line}: expected {expected} columns, found {found}")]
    MissingColumn {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("invalid bracket table: {0}")]
    InvalidBrackets(String),
}

/// Errors raised while reading or writing the calculation history file
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("history file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("history file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
