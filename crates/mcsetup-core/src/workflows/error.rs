use super::config::ConfigError;
use crate::core::io::control::ControlFileError;
use crate::core::models::system::SystemError;
use crate::core::moves::error::MoveSetError;
use crate::core::units::UnitError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid run configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    System(#[from] SystemError),

    #[error(transparent)]
    MoveSet(#[from] MoveSetError),

    #[error(transparent)]
    ControlFile(#[from] ControlFileError),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("System and move set do not match: {0}")]
    Inconsistent(String),

    #[error("Failed to access '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: ControlFileError,
    },
}
