use serde::{Deserialize, Serialize};

/// The minimal view of a molecular topology needed to derive move parameters.
///
/// Topology construction and force-field assignment happen elsewhere; the move
/// machinery only needs atom and bond counts to decide how a species may move.
pub trait SpeciesTopology {
    fn n_atoms(&self) -> usize;
    fn n_bonds(&self) -> usize;
}

/// A species described by its connectivity file name and atom/bond counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub n_atoms: usize,
    pub n_bonds: usize,
}

impl Species {
    pub fn new(name: impl Into<String>, n_atoms: usize, n_bonds: usize) -> Self {
        Self {
            name: name.into(),
            n_atoms,
            n_bonds,
        }
    }

    /// File name of the molecular connectivity file the engine reads for this species.
    pub fn mcf_file(&self) -> String {
        format!("{}.mcf", self.name)
    }
}

impl SpeciesTopology for Species {
    fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    fn n_bonds(&self) -> usize {
        self.n_bonds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeciesShape {
    /// A single interaction site; has no orientation and nothing to regrow.
    Point,
    /// Several atoms without bonds, treated as a fixed framework.
    Rigid,
    Flexible,
}

impl SpeciesShape {
    pub fn classify<T: SpeciesTopology + ?Sized>(topology: &T) -> Self {
        if topology.n_atoms() == 1 {
            Self::Point
        } else if topology.n_bonds() == 0 {
            Self::Rigid
        } else {
            Self::Flexible
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_distinguishes_point_rigid_and_flexible_species() {
        assert_eq!(SpeciesShape::classify(&Species::new("ar", 1, 0)), SpeciesShape::Point);
        assert_eq!(
            SpeciesShape::classify(&Species::new("zeolite", 24, 0)),
            SpeciesShape::Rigid
        );
        assert_eq!(
            SpeciesShape::classify(&Species::new("ethane", 2, 1)),
            SpeciesShape::Flexible
        );
    }

    #[test]
    fn mcf_file_appends_extension_to_name() {
        assert_eq!(Species::new("species1", 5, 4).mcf_file(), "species1.mcf");
    }
}
