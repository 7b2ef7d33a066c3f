use crate::core::units::UnitError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlFileError {
    #[error("Invalid probability info section '{key}'. Supported sections are: {supported}")]
    InvalidMoveKey { key: String, supported: String },

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Restricted insertion {0}")]
    RestrictedInsertion(String),

    #[error("Restart input file '{}' does not exist", path.display())]
    MissingRestartFile { path: PathBuf },

    #[error("Restart run length ({requested}) is shorter than the original run length ({original})")]
    RestartLengthTooShort { requested: u64, original: u64 },

    #[error("Malformed control file: {0}")]
    Malformed(String),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ControlFileError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
