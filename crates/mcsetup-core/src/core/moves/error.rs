use super::ensemble::Ensemble;
use crate::core::units::UnitError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoveSetError {
    #[error("Invalid ensemble '{0}'. Supported ensembles are: nvt, npt, gcmc, gemc, gemc_npt")]
    InvalidEnsemble(String),

    #[error("Invalid species topology: {0}")]
    InvalidTopology(String),

    #[error("'{0}' cannot be changed. Please create a new MoveSet instead.")]
    ImmutableField(String),

    #[error("Unknown MoveSet field '{0}'")]
    UnknownField(String),

    #[error("{field} must be {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{field} must be {range}, found {value}")]
    OutOfRange {
        field: String,
        range: &'static str,
        value: f64,
    },

    #[error("{field} {requirement} for the '{ensemble}' ensemble")]
    EnsembleMismatch {
        field: String,
        ensemble: Ensemble,
        requirement: &'static str,
    },

    #[error("{field} must have shape {expected}, found {found}")]
    Shape {
        field: String,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("Invalid restricted insertion: {0}")]
    RestrictedInsertion(String),
}

impl MoveSetError {
    pub(crate) fn shape(field: &str, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Shape {
            field: field.to_string(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}
