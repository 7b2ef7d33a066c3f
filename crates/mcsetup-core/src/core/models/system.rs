use super::simbox::SimBox;
use super::species::{Species, SpeciesTopology};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SystemError {
    #[error("Invalid box: {0}")]
    InvalidBox(String),

    #[error("A system requires at least one {0}")]
    Empty(&'static str),

    #[error("'{field}' must have shape ({rows}, {cols}), found {found}")]
    Shape {
        field: &'static str,
        rows: usize,
        cols: usize,
        found: String,
    },

    #[error("Box {box_number} is empty but {count} molecules of species {species_number} are listed as already present")]
    EmptyBoxHasMolecules {
        box_number: usize,
        species_number: usize,
        count: usize,
    },

    #[error("Box {box_number} holds {found} particles but the listed molecule counts imply {expected}")]
    ParticleCountMismatch {
        box_number: usize,
        expected: usize,
        found: usize,
    },
}

/// Boxes, species, and the molecule counts used to start a simulation.
///
/// Counts are indexed `[box][species]`.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    boxes: Vec<SimBox>,
    species: Vec<Species>,
    mols_in_boxes: Vec<Vec<usize>>,
    mols_to_add: Vec<Vec<usize>>,
}

impl System {
    pub fn builder() -> SystemBuilder {
        SystemBuilder::default()
    }

    pub fn boxes(&self) -> &[SimBox] {
        &self.boxes
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn n_boxes(&self) -> usize {
        self.boxes.len()
    }

    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    pub fn mols_in_boxes(&self) -> &[Vec<usize>] {
        &self.mols_in_boxes
    }

    pub fn mols_to_add(&self) -> &[Vec<usize>] {
        &self.mols_to_add
    }

    /// Total molecules of `species` across all boxes, existing plus to-add.
    pub fn total_molecules(&self, species: usize) -> usize {
        self.mols_in_boxes
            .iter()
            .chain(self.mols_to_add.iter())
            .map(|row| row[species])
            .sum()
    }
}

#[derive(Default)]
pub struct SystemBuilder {
    boxes: Vec<SimBox>,
    species: Vec<Species>,
    mols_in_boxes: Option<Vec<Vec<usize>>>,
    mols_to_add: Option<Vec<Vec<usize>>>,
}

impl SystemBuilder {
    pub fn simbox(mut self, simbox: SimBox) -> Self {
        self.boxes.push(simbox);
        self
    }
    pub fn boxes(mut self, boxes: Vec<SimBox>) -> Self {
        self.boxes = boxes;
        self
    }
    pub fn species(mut self, species: Species) -> Self {
        self.species.push(species);
        self
    }
    pub fn mols_in_boxes(mut self, counts: Vec<Vec<usize>>) -> Self {
        self.mols_in_boxes = Some(counts);
        self
    }
    pub fn mols_to_add(mut self, counts: Vec<Vec<usize>>) -> Self {
        self.mols_to_add = Some(counts);
        self
    }

    pub fn build(self) -> Result<System, SystemError> {
        if self.boxes.is_empty() {
            return Err(SystemError::Empty("box"));
        }
        if self.species.is_empty() {
            return Err(SystemError::Empty("species"));
        }
        let (n_boxes, n_species) = (self.boxes.len(), self.species.len());
        let zeros = || vec![vec![0; n_species]; n_boxes];

        let mols_in_boxes = self.mols_in_boxes.unwrap_or_else(zeros);
        let mols_to_add = self.mols_to_add.unwrap_or_else(zeros);
        check_shape("mols_in_boxes", &mols_in_boxes, n_boxes, n_species)?;
        check_shape("mols_to_add", &mols_to_add, n_boxes, n_species)?;

        for (ibox, (simbox, counts)) in self.boxes.iter().zip(&mols_in_boxes).enumerate() {
            match simbox.n_particles() {
                None => {
                    if let Some((isp, &count)) = counts.iter().enumerate().find(|(_, c)| **c > 0) {
                        return Err(SystemError::EmptyBoxHasMolecules {
                            box_number: ibox + 1,
                            species_number: isp + 1,
                            count,
                        });
                    }
                }
                Some(found) => {
                    let expected: usize = counts
                        .iter()
                        .zip(&self.species)
                        .map(|(count, species)| count * species.n_atoms())
                        .sum();
                    if expected != found {
                        return Err(SystemError::ParticleCountMismatch {
                            box_number: ibox + 1,
                            expected,
                            found,
                        });
                    }
                }
            }
        }

        Ok(System {
            boxes: self.boxes,
            species: self.species,
            mols_in_boxes,
            mols_to_add,
        })
    }
}

fn check_shape(
    field: &'static str,
    counts: &[Vec<usize>],
    rows: usize,
    cols: usize,
) -> Result<(), SystemError> {
    if counts.len() != rows || counts.iter().any(|row| row.len() != cols) {
        let found = format!(
            "({}, [{}])",
            counts.len(),
            counts
                .iter()
                .map(|r| r.len().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        return Err(SystemError::Shape {
            field,
            rows,
            cols,
            found,
        });
    }
    Ok(())
}
