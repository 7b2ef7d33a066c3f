//! Name-keyed access to [`MoveSet`] fields.
//!
//! Every settable field has one entry in [`FIELD_SETTERS`]. An entry converts a
//! loosely typed [`FieldValue`] (as produced by configuration files or command
//! lines) into the field's typed setter, which performs the range and ensemble
//! checks. Booleans are never accepted where a number is expected.

use super::error::MoveSetError;
use super::moveset::MoveSet;
use crate::core::units::Quantity;
use phf::{phf_map, phf_set};

/// A dynamically typed value for [`MoveSet::set_field`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Quantity(Quantity),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "a boolean",
            Self::Integer(_) => "an integer",
            Self::Float(_) => "a float",
            Self::Quantity(_) => "a quantity",
            Self::List(_) => "a list",
        }
    }

    fn mismatch(&self, field: &str, expected: &'static str) -> MoveSetError {
        MoveSetError::TypeMismatch {
            field: field.to_string(),
            expected,
            found: self.kind(),
        }
    }

    fn as_real(&self, field: &str) -> Result<f64, MoveSetError> {
        match *self {
            Self::Float(v) => Ok(v),
            Self::Integer(v) => Ok(v as f64),
            _ => Err(self.mismatch(field, "a real number")),
        }
    }

    fn as_count(&self, field: &str) -> Result<u32, MoveSetError> {
        match *self {
            Self::Integer(v) => u32::try_from(v).map_err(|_| MoveSetError::OutOfRange {
                field: field.to_string(),
                range: "a positive integer",
                value: v as f64,
            }),
            _ => Err(self.mismatch(field, "an integer")),
        }
    }

    fn as_bool(&self, field: &str) -> Result<bool, MoveSetError> {
        match *self {
            Self::Bool(b) => Ok(b),
            _ => Err(self.mismatch(field, "a boolean")),
        }
    }

    fn as_quantity(&self, field: &str) -> Result<Quantity, MoveSetError> {
        match *self {
            Self::Quantity(q) => Ok(q),
            _ => Err(self.mismatch(field, "a quantity with units")),
        }
    }

    fn as_list(&self, field: &str) -> Result<&[FieldValue], MoveSetError> {
        match self {
            Self::List(items) => Ok(items.as_slice()),
            _ => Err(self.mismatch(field, "a list")),
        }
    }

    fn reals(&self, field: &str) -> Result<Vec<f64>, MoveSetError> {
        self.as_list(field)?.iter().map(|v| v.as_real(field)).collect()
    }

    fn bools(&self, field: &str) -> Result<Vec<bool>, MoveSetError> {
        self.as_list(field)?.iter().map(|v| v.as_bool(field)).collect()
    }

    fn quantities(&self, field: &str) -> Result<Vec<Quantity>, MoveSetError> {
        self.as_list(field)?.iter().map(|v| v.as_quantity(field)).collect()
    }

    /// A single quantity is repeated `n` times.
    fn quantities_or_broadcast(&self, field: &str, n: usize) -> Result<Vec<Quantity>, MoveSetError> {
        match *self {
            Self::Quantity(q) => Ok(vec![q; n]),
            _ => self.quantities(field),
        }
    }

    fn quantity_rows(&self, field: &str) -> Result<Vec<Vec<Quantity>>, MoveSetError> {
        self.as_list(field)?.iter().map(|row| row.quantities(field)).collect()
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Quantity> for FieldValue {
    fn from(v: Quantity) -> Self {
        Self::Quantity(v)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Strings are read as quantities (`"2.0 angstrom"`); arrays become lists.
impl TryFrom<toml::Value> for FieldValue {
    type Error = MoveSetError;

    fn try_from(value: toml::Value) -> Result<Self, Self::Error> {
        match value {
            toml::Value::Boolean(b) => Ok(Self::Bool(b)),
            toml::Value::Integer(i) => Ok(Self::Integer(i)),
            toml::Value::Float(f) => Ok(Self::Float(f)),
            toml::Value::String(s) => Ok(Self::Quantity(s.parse()?)),
            toml::Value::Array(items) => items
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            other => Err(MoveSetError::TypeMismatch {
                field: "value".to_string(),
                expected: "a number, boolean, quantity string or array",
                found: other.type_str(),
            }),
        }
    }
}

pub(crate) type FieldSetter = fn(&mut MoveSet, &FieldValue) -> Result<(), MoveSetError>;

pub(crate) static IMMUTABLE_FIELDS: phf::Set<&'static str> = phf_set! {
    "ensemble",
    "n_boxes",
    "n_species",
};

pub(crate) static FIELD_SETTERS: phf::Map<&'static str, FieldSetter> = phf_map! {
    "prob_translate" => prob_translate as FieldSetter,
    "prob_rotate" => prob_rotate as FieldSetter,
    "prob_angle" => prob_angle as FieldSetter,
    "prob_dihedral" => prob_dihedral as FieldSetter,
    "prob_regrow" => prob_regrow as FieldSetter,
    "prob_volume" => prob_volume as FieldSetter,
    "prob_insert" => prob_insert as FieldSetter,
    "prob_swap" => prob_swap as FieldSetter,
    "max_translate" => max_translate as FieldSetter,
    "max_rotate" => max_rotate as FieldSetter,
    "max_dihedral" => max_dihedral as FieldSetter,
    "max_volume" => max_volume as FieldSetter,
    "insertable" => insertable as FieldSetter,
    "prob_swap_species" => prob_swap_species as FieldSetter,
    "prob_regrow_species" => prob_regrow_species as FieldSetter,
    "prob_swap_from_box" => prob_swap_from_box as FieldSetter,
    "cbmc_n_insert" => cbmc_n_insert as FieldSetter,
    "cbmc_n_dihed" => cbmc_n_dihed as FieldSetter,
    "cbmc_rcut" => cbmc_rcut as FieldSetter,
};

fn prob_translate(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_prob_translate(v.as_real("prob_translate")?)
}

fn prob_rotate(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_prob_rotate(v.as_real("prob_rotate")?)
}

fn prob_angle(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_prob_angle(v.as_real("prob_angle")?)
}

fn prob_dihedral(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_prob_dihedral(v.as_real("prob_dihedral")?)
}

fn prob_regrow(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_prob_regrow(v.as_real("prob_regrow")?)
}

fn prob_volume(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_prob_volume(v.as_real("prob_volume")?)
}

fn prob_insert(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_prob_insert(v.as_real("prob_insert")?)
}

fn prob_swap(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_prob_swap(v.as_real("prob_swap")?)
}

fn max_translate(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_max_translate(&v.quantity_rows("max_translate")?)
}

fn max_rotate(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_max_rotate(&v.quantity_rows("max_rotate")?)
}

fn max_dihedral(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_max_dihedral(&v.quantities("max_dihedral")?)
}

fn max_volume(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    let n = m.ensemble().n_volume_moves();
    m.set_max_volume(&v.quantities_or_broadcast("max_volume", n)?)
}

fn insertable(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_insertable(&v.bools("insertable")?)
}

fn prob_swap_species(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_prob_swap_species(&v.reals("prob_swap_species")?)
}

fn prob_regrow_species(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_prob_regrow_species(&v.reals("prob_regrow_species")?)
}

fn prob_swap_from_box(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_prob_swap_from_box(&v.reals("prob_swap_from_box")?)
}

fn cbmc_n_insert(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_cbmc_n_insert(v.as_count("cbmc_n_insert")?)
}

fn cbmc_n_dihed(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    m.set_cbmc_n_dihed(v.as_count("cbmc_n_dihed")?)
}

fn cbmc_rcut(m: &mut MoveSet, v: &FieldValue) -> Result<(), MoveSetError> {
    let n = m.n_boxes();
    m.set_cbmc_rcut(&v.quantities_or_broadcast("cbmc_rcut", n)?)
}
