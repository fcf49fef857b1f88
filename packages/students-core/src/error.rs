//! Database and configuration error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::FieldViolation;

pub use sqlx::Error as SqlxError;

/// Storage and domain operation errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// No row matches the requested id
    #[error("no student found with id {id}")]
    StudentNotFound { id: i64 },

    /// Partial update carried none of the recognized fields
    #[error("no fields to update")]
    NoFieldsToUpdate,

    /// Creation payload failed field validation
    #[error("{}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// Value rejected by a column's type
    #[error("type mismatch for field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        got: String,
    },

    /// Failure reported by the SQLite driver
    #[error("query error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected shape
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Config values are out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}
