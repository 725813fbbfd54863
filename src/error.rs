// ⚠️ Error Types - one enum per failure scope
//
// Record-scoped errors drop a single record, reference-data and config errors
// abort the run, render errors abort a single chunk.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// RECORD VALIDATION
// ============================================================================

/// A raw record could not become a Patron.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A mandatory field (identifier or username) is empty
    #[error("line {line}: required field '{field}' is empty")]
    MissingField { field: &'static str, line: usize },

    /// The raw category code is not in the patron-type table
    #[error("line {line}: unrecognized patron category '{code}'")]
    UnknownPatronType { code: String, line: usize },
}

// ============================================================================
// REFERENCE DATA
// ============================================================================

#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("failed to read reference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed reference file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("reference file {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },
}

// ============================================================================
// RENDERING
// ============================================================================

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize chunk: {0}")]
    Xml(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
