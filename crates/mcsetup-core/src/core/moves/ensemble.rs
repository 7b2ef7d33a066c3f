use super::error::MoveSetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Statistical-mechanical sampling regime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ensemble {
    Nvt,
    Npt,
    Gcmc,
    Gemc,
    GemcNpt,
}

/// Selection weight of each move class.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveProbabilities {
    pub translate: f64,
    pub rotate: f64,
    pub angle: f64,
    pub dihedral: f64,
    pub regrow: f64,
    pub volume: f64,
    pub insert: f64,
    pub swap: f64,
}

impl Ensemble {
    pub const ALL: [Ensemble; 5] = [
        Ensemble::Nvt,
        Ensemble::Npt,
        Ensemble::Gcmc,
        Ensemble::Gemc,
        Ensemble::GemcNpt,
    ];

    pub fn n_boxes(self) -> usize {
        match self {
            Self::Nvt | Self::Npt | Self::Gcmc => 1,
            Self::Gemc | Self::GemcNpt => 2,
        }
    }

    /// Short name, also used as the default run name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nvt => "nvt",
            Self::Npt => "npt",
            Self::Gcmc => "gcmc",
            Self::Gemc => "gemc",
            Self::GemcNpt => "gemc_npt",
        }
    }

    /// Keyword of the `Sim_Type` section.
    pub fn sim_type(self) -> &'static str {
        match self {
            Self::Nvt => "nvt_mc",
            Self::Npt => "npt_mc",
            Self::Gcmc => "gcmc",
            Self::Gemc => "gemc",
            Self::GemcNpt => "gemc_npt",
        }
    }

    pub fn has_volume_moves(self) -> bool {
        matches!(self, Self::Npt | Self::Gemc | Self::GemcNpt)
    }

    pub fn has_insertions(self) -> bool {
        matches!(self, Self::Gcmc)
    }

    pub fn has_swaps(self) -> bool {
        matches!(self, Self::Gemc | Self::GemcNpt)
    }

    /// Whether molecules enter a box by insertion or swap in this ensemble.
    pub fn exchanges_molecules(self) -> bool {
        self.has_insertions() || self.has_swaps()
    }

    pub fn requires_pressure(self) -> bool {
        matches!(self, Self::Npt | Self::GemcNpt)
    }

    /// Number of independently adjustable volume displacements.
    pub fn n_volume_moves(self) -> usize {
        match self {
            Self::GemcNpt => 2,
            _ => 1,
        }
    }

    pub(crate) fn default_max_volume(self) -> Vec<f64> {
        match self {
            Self::Nvt | Self::Gcmc => vec![0.0],
            Self::Npt | Self::Gemc => vec![500.0],
            Self::GemcNpt => vec![500.0, 5000.0],
        }
    }

    pub(crate) fn default_probabilities(self) -> MoveProbabilities {
        let (translate, rotate, regrow, volume, insert, swap) = match self {
            Self::Nvt => (0.35, 0.35, 0.30, 0.0, 0.0, 0.0),
            Self::Npt => (0.34, 0.34, 0.30, 0.02, 0.0, 0.0),
            Self::Gcmc => (0.25, 0.25, 0.30, 0.0, 0.1, 0.0),
            Self::Gemc | Self::GemcNpt => (0.29, 0.29, 0.30, 0.02, 0.0, 0.1),
        };
        MoveProbabilities {
            translate,
            rotate,
            angle: 0.0,
            dihedral: 0.0,
            regrow,
            volume,
            insert,
            swap,
        }
    }
}

impl FromStr for Ensemble {
    type Err = MoveSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nvt" => Ok(Self::Nvt),
            "npt" => Ok(Self::Npt),
            "gcmc" => Ok(Self::Gcmc),
            "gemc" => Ok(Self::Gemc),
            "gemc_npt" | "gemc-npt" => Ok(Self::GemcNpt),
            _ => Err(MoveSetError::InvalidEnsemble(s.to_string())),
        }
    }
}

impl fmt::Display for Ensemble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
