use super::ensemble::{Ensemble, MoveProbabilities};
use super::error::MoveSetError;
use super::fields::{FIELD_SETTERS, FieldValue, IMMUTABLE_FIELDS};
use super::restricted::{self, RestrictedInsertion, RestrictionGrid};
use crate::core::models::species::{SpeciesShape, SpeciesTopology};
use crate::core::units::{self, Dimension, Quantity};
use std::fmt;
use tracing::{debug, warn};

pub const DEFAULT_MAX_TRANSLATE: f64 = 2.0;
pub const DEFAULT_MAX_ROTATE: f64 = 30.0;
pub const DEFAULT_CBMC_N_INSERT: u32 = 10;
pub const DEFAULT_CBMC_N_DIHED: u32 = 10;
pub const DEFAULT_CBMC_RCUT: f64 = 6.0;

/// Move-class probabilities and per-box/per-species move parameters for one run.
///
/// Values are held in engine units (Å, degrees, Å³). Per-box rows are owned
/// independently, so editing one box never affects another. Every setter
/// validates the complete new value before storing it; a rejected value leaves
/// the field unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveSet {
    ensemble: Ensemble,
    n_boxes: usize,
    n_species: usize,

    prob_translate: f64,
    prob_rotate: f64,
    prob_angle: f64,
    prob_dihedral: f64,
    prob_regrow: f64,
    prob_volume: f64,
    prob_insert: f64,
    prob_swap: f64,

    max_translate: Vec<Vec<f64>>,
    max_rotate: Vec<Vec<f64>>,
    max_dihedral: Vec<f64>,
    max_volume: Vec<f64>,

    insertable: Vec<bool>,
    prob_swap_species: Vec<f64>,
    prob_regrow_species: Vec<f64>,
    prob_swap_from_box: Vec<f64>,

    cbmc_n_insert: u32,
    cbmc_n_dihed: u32,
    cbmc_rcut: Vec<f64>,

    restricted_insertions: Option<RestrictionGrid>,
}

impl MoveSet {
    /// Derives a complete move set for `ensemble` from the species topologies.
    ///
    /// Each species is classified by shape. Single-site species never rotate
    /// or regrow. Multi-atom species without bonds are frozen: they do not
    /// translate, rotate, regrow, or exchange between boxes. Regrowth and swap
    /// weights are then shared equally among the species still eligible, and
    /// the probability of a move class no species can perform is handed to
    /// translation (and rotation, for regrowth).
    ///
    /// # Errors
    ///
    /// Returns [`MoveSetError::InvalidTopology`] if `species` is empty or any
    /// species has no atoms.
    pub fn new<T: SpeciesTopology>(ensemble: Ensemble, species: &[T]) -> Result<Self, MoveSetError> {
        if species.is_empty() {
            return Err(MoveSetError::InvalidTopology(
                "at least one species topology is required".to_string(),
            ));
        }
        if let Some(index) = species.iter().position(|s| s.n_atoms() == 0) {
            return Err(MoveSetError::InvalidTopology(format!(
                "species {} has no atoms",
                index + 1
            )));
        }

        let n_boxes = ensemble.n_boxes();
        let n_species = species.len();
        let MoveProbabilities {
            mut translate,
            mut rotate,
            angle,
            dihedral,
            mut regrow,
            volume,
            insert,
            swap,
        } = ensemble.default_probabilities();

        let mut max_translate = vec![vec![DEFAULT_MAX_TRANSLATE; n_species]; n_boxes];
        let mut max_rotate = vec![vec![DEFAULT_MAX_ROTATE; n_species]; n_boxes];
        let mut insertable = vec![ensemble.exchanges_molecules(); n_species];
        let mut prob_swap_species = vec![if ensemble.has_swaps() { 1.0 } else { 0.0 }; n_species];
        let mut prob_regrow_species = vec![1.0; n_species];

        for (isp, topology) in species.iter().enumerate() {
            match SpeciesShape::classify(topology) {
                SpeciesShape::Point => {
                    max_rotate.iter_mut().for_each(|row| row[isp] = 0.0);
                    prob_regrow_species[isp] = 0.0;
                }
                SpeciesShape::Rigid => {
                    warn!(
                        "Species {} has {} atoms and no bonds; treating it as a rigid framework \
                         that is not translated, rotated, regrown, inserted or swapped.",
                        isp + 1,
                        topology.n_atoms()
                    );
                    max_translate.iter_mut().for_each(|row| row[isp] = 0.0);
                    max_rotate.iter_mut().for_each(|row| row[isp] = 0.0);
                    prob_regrow_species[isp] = 0.0;
                    insertable[isp] = false;
                    prob_swap_species[isp] = 0.0;
                }
                SpeciesShape::Flexible => {}
            }
        }

        // Eligible species share the weight equally, not in proportion.
        let regrow_total: f64 = prob_regrow_species.iter().sum();
        for p in prob_regrow_species.iter_mut().filter(|p| **p > 0.0) {
            *p = 1.0 / regrow_total;
        }
        let swap_total: f64 = prob_swap_species.iter().sum();
        if swap_total > 0.0 {
            for (p, _) in prob_swap_species
                .iter_mut()
                .zip(&insertable)
                .filter(|(_, ins)| **ins)
            {
                *p = 1.0 / swap_total;
            }
        }

        if prob_regrow_species.iter().sum::<f64>() == 0.0 {
            debug!("No species can be regrown; redistributing regrowth probability.");
            translate += regrow / 2.0;
            rotate += regrow / 2.0;
            regrow = 0.0;
        }
        if max_rotate.iter().flatten().sum::<f64>() == 0.0 {
            debug!("No species can be rotated; redistributing rotation probability.");
            translate += rotate;
            rotate = 0.0;
        }

        Ok(Self {
            ensemble,
            n_boxes,
            n_species,
            prob_translate: translate,
            prob_rotate: rotate,
            prob_angle: angle,
            prob_dihedral: dihedral,
            prob_regrow: regrow,
            prob_volume: volume,
            prob_insert: insert,
            prob_swap: swap,
            max_translate,
            max_rotate,
            max_dihedral: vec![0.0; n_species],
            max_volume: ensemble.default_max_volume(),
            insertable,
            prob_swap_species,
            prob_regrow_species,
            prob_swap_from_box: vec![1.0 / n_boxes as f64; n_boxes],
            cbmc_n_insert: DEFAULT_CBMC_N_INSERT,
            cbmc_n_dihed: DEFAULT_CBMC_N_DIHED,
            cbmc_rcut: vec![DEFAULT_CBMC_RCUT; n_boxes],
            restricted_insertions: None,
        })
    }

    /// Sets a field by name.
    ///
    /// # Errors
    ///
    /// Returns [`MoveSetError::ImmutableField`] for `ensemble`, `n_boxes` and
    /// `n_species`, [`MoveSetError::UnknownField`] for names that are not
    /// fields, and otherwise whatever the field's own validation reports.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), MoveSetError> {
        if IMMUTABLE_FIELDS.contains(name) {
            return Err(MoveSetError::ImmutableField(name.to_string()));
        }
        let setter = FIELD_SETTERS
            .get(name)
            .ok_or_else(|| MoveSetError::UnknownField(name.to_string()))?;
        setter(self, &value.into())
    }

    /// Names accepted by [`MoveSet::set_field`].
    pub fn field_names() -> impl Iterator<Item = &'static str> {
        FIELD_SETTERS.keys().copied()
    }

    /// Registers insertion restrictions, replacing any registered before.
    ///
    /// `restricted_type` and `restricted_value` are indexed `[box][species]`.
    pub fn add_restricted_insertions<T, S>(
        &mut self,
        species: &[T],
        restricted_type: &[Vec<Option<S>>],
        restricted_value: &[Vec<Option<Vec<Quantity>>>],
    ) -> Result<(), MoveSetError>
    where
        T: SpeciesTopology,
        S: AsRef<str>,
    {
        if species.len() != self.n_species {
            return Err(MoveSetError::InvalidTopology(format!(
                "expected {} species topologies, found {}",
                self.n_species,
                species.len()
            )));
        }
        let grid = restricted::validate_restrictions(
            self.ensemble,
            self.n_species,
            restricted_type,
            restricted_value,
        )?;
        if self.restricted_insertions.is_some() {
            warn!("Restricted insertions were already set; overwriting the previous restrictions.");
        }
        self.restricted_insertions = Some(grid);
        Ok(())
    }

    pub fn clear_restricted_insertions(&mut self) {
        self.restricted_insertions = None;
    }

    pub fn ensemble(&self) -> Ensemble {
        self.ensemble
    }
    pub fn n_boxes(&self) -> usize {
        self.n_boxes
    }
    pub fn n_species(&self) -> usize {
        self.n_species
    }

    pub fn probabilities(&self) -> MoveProbabilities {
        MoveProbabilities {
            translate: self.prob_translate,
            rotate: self.prob_rotate,
            angle: self.prob_angle,
            dihedral: self.prob_dihedral,
            regrow: self.prob_regrow,
            volume: self.prob_volume,
            insert: self.prob_insert,
            swap: self.prob_swap,
        }
    }

    pub fn prob_translate(&self) -> f64 {
        self.prob_translate
    }
    pub fn prob_rotate(&self) -> f64 {
        self.prob_rotate
    }
    pub fn prob_angle(&self) -> f64 {
        self.prob_angle
    }
    pub fn prob_dihedral(&self) -> f64 {
        self.prob_dihedral
    }
    pub fn prob_regrow(&self) -> f64 {
        self.prob_regrow
    }
    pub fn prob_volume(&self) -> f64 {
        self.prob_volume
    }
    pub fn prob_insert(&self) -> f64 {
        self.prob_insert
    }
    pub fn prob_swap(&self) -> f64 {
        self.prob_swap
    }
    pub fn max_translate(&self) -> &[Vec<f64>] {
        &self.max_translate
    }
    pub fn max_rotate(&self) -> &[Vec<f64>] {
        &self.max_rotate
    }
    pub fn max_dihedral(&self) -> &[f64] {
        &self.max_dihedral
    }
    pub fn max_volume(&self) -> &[f64] {
        &self.max_volume
    }
    pub fn insertable(&self) -> &[bool] {
        &self.insertable
    }
    pub fn prob_swap_species(&self) -> &[f64] {
        &self.prob_swap_species
    }
    pub fn prob_regrow_species(&self) -> &[f64] {
        &self.prob_regrow_species
    }
    pub fn prob_swap_from_box(&self) -> &[f64] {
        &self.prob_swap_from_box
    }
    pub fn cbmc_n_insert(&self) -> u32 {
        self.cbmc_n_insert
    }
    pub fn cbmc_n_dihed(&self) -> u32 {
        self.cbmc_n_dihed
    }
    pub fn cbmc_rcut(&self) -> &[f64] {
        &self.cbmc_rcut
    }
    pub fn restricted_insertions(&self) -> Option<&[Vec<Option<RestrictedInsertion>>]> {
        self.restricted_insertions.as_deref()
    }

    pub fn set_prob_translate(&mut self, value: f64) -> Result<(), MoveSetError> {
        self.prob_translate = probability("prob_translate", value)?;
        Ok(())
    }

    pub fn set_prob_rotate(&mut self, value: f64) -> Result<(), MoveSetError> {
        self.prob_rotate = probability("prob_rotate", value)?;
        Ok(())
    }

    pub fn set_prob_angle(&mut self, value: f64) -> Result<(), MoveSetError> {
        self.prob_angle = probability("prob_angle", value)?;
        Ok(())
    }

    pub fn set_prob_dihedral(&mut self, value: f64) -> Result<(), MoveSetError> {
        self.prob_dihedral = probability("prob_dihedral", value)?;
        Ok(())
    }

    pub fn set_prob_regrow(&mut self, value: f64) -> Result<(), MoveSetError> {
        self.prob_regrow = probability("prob_regrow", value)?;
        Ok(())
    }

    pub fn set_prob_volume(&mut self, value: f64) -> Result<(), MoveSetError> {
        let value = probability("prob_volume", value)?;
        self.ensemble_gate("prob_volume", value, self.ensemble.has_volume_moves())?;
        self.prob_volume = value;
        Ok(())
    }

    pub fn set_prob_insert(&mut self, value: f64) -> Result<(), MoveSetError> {
        let value = probability("prob_insert", value)?;
        self.ensemble_gate("prob_insert", value, self.ensemble.has_insertions())?;
        self.prob_insert = value;
        Ok(())
    }

    pub fn set_prob_swap(&mut self, value: f64) -> Result<(), MoveSetError> {
        let value = probability("prob_swap", value)?;
        self.ensemble_gate("prob_swap", value, self.ensemble.has_swaps())?;
        self.prob_swap = value;
        Ok(())
    }

    pub fn set_max_translate(&mut self, values: &[Vec<Quantity>]) -> Result<(), MoveSetError> {
        self.max_translate = self.box_species_grid("max_translate", values, Dimension::Length, non_negative)?;
        Ok(())
    }

    pub fn set_max_rotate(&mut self, values: &[Vec<Quantity>]) -> Result<(), MoveSetError> {
        self.max_rotate = self.box_species_grid("max_rotate", values, Dimension::Angle, full_turn)?;
        Ok(())
    }

    pub fn set_max_dihedral(&mut self, values: &[Quantity]) -> Result<(), MoveSetError> {
        self.max_dihedral = checked_list("max_dihedral", values, self.n_species, Dimension::Angle, full_turn)?;
        Ok(())
    }

    pub fn set_max_volume(&mut self, values: &[Quantity]) -> Result<(), MoveSetError> {
        let expected = self.ensemble.n_volume_moves();
        self.max_volume = checked_list("max_volume", values, expected, Dimension::Volume, non_negative)?;
        Ok(())
    }

    pub fn set_insertable(&mut self, values: &[bool]) -> Result<(), MoveSetError> {
        expect_len("insertable", values.len(), self.n_species)?;
        self.insertable = values.to_vec();
        Ok(())
    }

    pub fn set_prob_swap_species(&mut self, values: &[f64]) -> Result<(), MoveSetError> {
        expect_len("prob_swap_species", values.len(), self.n_species)?;
        self.prob_swap_species = probabilities("prob_swap_species", values)?;
        Ok(())
    }

    pub fn set_prob_regrow_species(&mut self, values: &[f64]) -> Result<(), MoveSetError> {
        expect_len("prob_regrow_species", values.len(), self.n_species)?;
        self.prob_regrow_species = probabilities("prob_regrow_species", values)?;
        Ok(())
    }

    pub fn set_prob_swap_from_box(&mut self, values: &[f64]) -> Result<(), MoveSetError> {
        expect_len("prob_swap_from_box", values.len(), self.n_boxes)?;
        self.prob_swap_from_box = probabilities("prob_swap_from_box", values)?;
        Ok(())
    }

    pub fn set_cbmc_n_insert(&mut self, value: u32) -> Result<(), MoveSetError> {
        self.cbmc_n_insert = positive_count("cbmc_n_insert", value)?;
        Ok(())
    }

    pub fn set_cbmc_n_dihed(&mut self, value: u32) -> Result<(), MoveSetError> {
        self.cbmc_n_dihed = positive_count("cbmc_n_dihed", value)?;
        Ok(())
    }

    pub fn set_cbmc_rcut(&mut self, values: &[Quantity]) -> Result<(), MoveSetError> {
        self.cbmc_rcut = checked_list("cbmc_rcut", values, self.n_boxes, Dimension::Length, non_negative)?;
        Ok(())
    }

    fn ensemble_gate(&self, field: &str, value: f64, allowed: bool) -> Result<(), MoveSetError> {
        let requirement = match (allowed, value == 0.0) {
            (true, true) => "must be greater than zero",
            (false, false) => "must be zero",
            _ => return Ok(()),
        };
        Err(MoveSetError::EnsembleMismatch {
            field: field.to_string(),
            ensemble: self.ensemble,
            requirement,
        })
    }

    fn box_species_grid(
        &self,
        field: &str,
        values: &[Vec<Quantity>],
        dimension: Dimension,
        check: fn(&str, f64) -> Result<f64, MoveSetError>,
    ) -> Result<Vec<Vec<f64>>, MoveSetError> {
        if values.len() != self.n_boxes || values.iter().any(|row| row.len() != self.n_species) {
            let found: Vec<_> = values.iter().map(|r| r.len().to_string()).collect();
            return Err(MoveSetError::shape(
                field,
                format!("({}, {})", self.n_boxes, self.n_species),
                format!("({}, [{}])", values.len(), found.join(", ")),
            ));
        }
        values
            .iter()
            .map(|row| checked_list(field, row, self.n_species, dimension, check))
            .collect()
    }
}

fn probability(field: &str, value: f64) -> Result<f64, MoveSetError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MoveSetError::OutOfRange {
            field: field.to_string(),
            range: "a probability in [0, 1]",
            value,
        });
    }
    Ok(value)
}

fn probabilities(field: &str, values: &[f64]) -> Result<Vec<f64>, MoveSetError> {
    values.iter().map(|&v| probability(field, v)).collect()
}

fn non_negative(field: &str, value: f64) -> Result<f64, MoveSetError> {
    if !(value >= 0.0 && value.is_finite()) {
        return Err(MoveSetError::OutOfRange {
            field: field.to_string(),
            range: "non-negative",
            value,
        });
    }
    Ok(value)
}

fn full_turn(field: &str, value: f64) -> Result<f64, MoveSetError> {
    if !(0.0..=360.0).contains(&value) {
        return Err(MoveSetError::OutOfRange {
            field: field.to_string(),
            range: "between 0 and 360 degrees",
            value,
        });
    }
    Ok(value)
}

fn positive_count(field: &str, value: u32) -> Result<u32, MoveSetError> {
    if value == 0 {
        return Err(MoveSetError::OutOfRange {
            field: field.to_string(),
            range: "a positive integer",
            value: 0.0,
        });
    }
    Ok(value)
}

fn expect_len(field: &str, found: usize, expected: usize) -> Result<(), MoveSetError> {
    if found != expected {
        return Err(MoveSetError::shape(field, format!("({expected},)"), format!("({found},)")));
    }
    Ok(())
}

fn checked_list(
    field: &str,
    values: &[Quantity],
    expected: usize,
    dimension: Dimension,
    check: fn(&str, f64) -> Result<f64, MoveSetError>,
) -> Result<Vec<f64>, MoveSetError> {
    expect_len(field, values.len(), expected)?;
    units::validate_list(values, expected, dimension, field)?
        .into_iter()
        .map(|v| check(field, v))
        .collect()
}

const COLUMN: usize = 12;

impl fmt::Display for MoveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ensemble: {}", self.ensemble)?;
        writeln!(f)?;
        writeln!(f, "Probability of selecting each move type:")?;
        for (label, value) in [
            ("Translate", self.prob_translate),
            ("Rotate", self.prob_rotate),
            ("Regrow", self.prob_regrow),
            ("Volume", self.prob_volume),
            ("Insert", self.prob_insert),
            ("Delete", self.prob_insert),
            ("Swap", self.prob_swap),
            ("Angle", self.prob_angle),
            ("Dihedral", self.prob_dihedral),
        ] {
            writeln!(f, "    {:<11}{}", format!("{label}:"), value)?;
        }

        writeln!(f)?;
        writeln!(f, "CBMC selections:")?;
        writeln!(f, "    Number of trial positions: {}", self.cbmc_n_insert)?;
        writeln!(f, "    Number of trial dihedral angles: {}", self.cbmc_n_dihed)?;
        writeln!(f, "    CBMC cutoff(s):")?;
        for (ibox, rcut) in self.cbmc_rcut.iter().enumerate() {
            writeln!(f, "        Box {}: {}", ibox + 1, rcut)?;
        }

        writeln!(f)?;
        writeln!(f, "Per species quantities:")?;
        write!(f, "{:<29}", "")?;
        for isp in 0..self.n_species {
            write!(f, "{:<COLUMN$}", format!("species{}", isp + 1))?;
        }
        writeln!(f)?;
        let row = |f: &mut fmt::Formatter<'_>, label: &str, cells: Vec<String>, suffix: &str| {
            write!(f, "    {label:<25}")?;
            for cell in cells {
                write!(f, "{cell:<COLUMN$}")?;
            }
            writeln!(f, "{suffix}")
        };
        for (ibox, values) in self.max_translate.iter().enumerate() {
            let label = if ibox == 0 { "Max translate (Ang):" } else { "" };
            let cells = values.iter().map(|v| format!("{v:.2}")).collect();
            row(f, label, cells, &format!("(Box {})", ibox + 1))?;
        }
        for (ibox, values) in self.max_rotate.iter().enumerate() {
            let label = if ibox == 0 { "Max rotate (deg):" } else { "" };
            let cells = values.iter().map(|v| format!("{v:.2}")).collect();
            row(f, label, cells, &format!("(Box {})", ibox + 1))?;
        }
        row(f, "Insertable:", self.insertable.iter().map(|b| b.to_string()).collect(), "")?;
        row(f, "Max dihedral (deg):", self.max_dihedral.iter().map(|v| format!("{v:.2}")).collect(), "")?;
        row(f, "Prob swap:", self.prob_swap_species.iter().map(|v| format!("{v:.2}")).collect(), "")?;
        row(f, "Prob regrow:", self.prob_regrow_species.iter().map(|v| format!("{v:.2}")).collect(), "")?;

        writeln!(f)?;
        writeln!(f, "Max volume (Ang^3):")?;
        for (ibox, volume) in self.max_volume.iter().enumerate() {
            writeln!(f, "    Box {}: {}", ibox + 1, volume)?;
        }

        if let Some(grid) = &self.restricted_insertions {
            writeln!(f)?;
            writeln!(f, "Restricted insertions (Ang):")?;
            for (ibox, row) in grid.iter().enumerate() {
                for (isp, restriction) in row.iter().enumerate() {
                    if let Some(restriction) = restriction {
                        writeln!(f, "    Box {}, Species {}: {}", ibox + 1, isp + 1, restriction)?;
                    }
                }
            }
        }
        Ok(())
    }
}
