// src/error.rs

//! Error types shared by every pkgmeta module

use thiserror::Error;

/// Errors produced while reading, mutating or writing metadata
#[derive(Error, Debug)]
pub enum Error {
    /// The header block could not be parsed
    #[error("malformed header block at line {line}: {message}")]
    Format { line: usize, message: String },

    /// The `Metadata-Version` value is not one of the supported versions
    #[error("unrecognized metadata version: {0:?}")]
    UnrecognizedVersion(String),

    /// Setting a field would mix fields from incompatible metadata versions
    #[error("setting '{field}' conflicts with the fields already present: {message}")]
    VersionConflict { field: String, message: String },

    /// An environment marker could not be tokenized or parsed
    #[error("invalid environment marker: {0}")]
    MarkerSyntax(String),

    /// An environment marker parsed but could not be evaluated
    #[error("cannot evaluate environment marker: {0}")]
    MarkerEvaluation(String),

    /// A configuration file could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading or writing a metadata file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Format`] at the given line
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    /// Whether this error came from marker tokenizing, parsing or evaluation
    pub fn is_marker_error(&self) -> bool {
        matches!(self, Self::MarkerSyntax(_) | Self::MarkerEvaluation(_))
    }
}

/// Result type used throughout pkgmeta
pub type Result<T> = std::result::Result<T, Error>;
