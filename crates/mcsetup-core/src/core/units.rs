//! Dimensioned quantities and conversion into engine-native units.
//!
//! Every numeric input that carries a physical meaning (box lengths, rotation
//! limits, temperatures, chemical potentials, ...) enters the library as a
//! [`Quantity`]. Before any value reaches the control-file writer it is passed
//! through [`validate`] or [`validate_list`], which check the physical
//! [`Dimension`] and strip the unit, returning a plain `f64` expressed in the
//! unit the engine expects:
//!
//! | Dimension      | Engine unit |
//! |----------------|-------------|
//! | length         | Å           |
//! | angle          | degree      |
//! | volume         | Å³          |
//! | pressure       | bar         |
//! | temperature    | K           |
//! | energy/amount  | kJ/mol      |

use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnitError {
    #[error("{argument} must have dimensions of {expected}, found {found}")]
    WrongDimension {
        argument: String,
        expected: Dimension,
        found: Dimension,
    },

    #[error("{argument} must contain {expected} value(s), found {found}")]
    WrongShape {
        argument: String,
        expected: usize,
        found: usize,
    },

    #[error("Unrecognized unit symbol '{0}'")]
    UnknownUnit(String),

    #[error("Could not parse quantity '{0}'. Expected '<value> <unit>' (e.g., '2.0 angstrom')")]
    Malformed(String),
}

/// The physical dimension of a [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    Length,
    Angle,
    Volume,
    Pressure,
    Temperature,
    MolarEnergy,
    Dimensionless,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Length => "length",
            Self::Angle => "angle",
            Self::Volume => "length**3",
            Self::Pressure => "pressure",
            Self::Temperature => "temperature",
            Self::MolarEnergy => "energy/amount",
            Self::Dimensionless => "dimensionless",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Unit {
    Angstrom,
    Picometer,
    Nanometer,
    Meter,
    Degree,
    Radian,
    CubicAngstrom,
    CubicNanometer,
    Bar,
    Atmosphere,
    Pascal,
    Kilopascal,
    Megapascal,
    Kelvin,
    Celsius,
    KilojoulePerMole,
    KilocaloriePerMole,
    JoulePerMole,
    Dimensionless,
}

static UNIT_SYMBOLS: phf::Map<&'static str, Unit> = phf_map! {
    "angstrom" => Unit::Angstrom,
    "angstroms" => Unit::Angstrom,
    "Å" => Unit::Angstrom,
    "pm" => Unit::Picometer,
    "nm" => Unit::Nanometer,
    "m" => Unit::Meter,
    "degree" => Unit::Degree,
    "degrees" => Unit::Degree,
    "deg" => Unit::Degree,
    "°" => Unit::Degree,
    "rad" => Unit::Radian,
    "radian" => Unit::Radian,
    "radians" => Unit::Radian,
    "angstrom**3" => Unit::CubicAngstrom,
    "Å**3" => Unit::CubicAngstrom,
    "Å³" => Unit::CubicAngstrom,
    "nm**3" => Unit::CubicNanometer,
    "nm³" => Unit::CubicNanometer,
    "bar" => Unit::Bar,
    "atm" => Unit::Atmosphere,
    "Pa" => Unit::Pascal,
    "kPa" => Unit::Kilopascal,
    "MPa" => Unit::Megapascal,
    "K" => Unit::Kelvin,
    "kelvin" => Unit::Kelvin,
    "degC" => Unit::Celsius,
    "°C" => Unit::Celsius,
    "kJ/mol" => Unit::KilojoulePerMole,
    "kcal/mol" => Unit::KilocaloriePerMole,
    "J/mol" => Unit::JoulePerMole,
    "dimensionless" => Unit::Dimensionless,
};

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Self::Angstrom | Self::Picometer | Self::Nanometer | Self::Meter => Dimension::Length,
            Self::Degree | Self::Radian => Dimension::Angle,
            Self::CubicAngstrom | Self::CubicNanometer => Dimension::Volume,
            Self::Bar | Self::Atmosphere | Self::Pascal | Self::Kilopascal | Self::Megapascal => {
                Dimension::Pressure
            }
            Self::Kelvin | Self::Celsius => Dimension::Temperature,
            Self::KilojoulePerMole | Self::KilocaloriePerMole | Self::JoulePerMole => {
                Dimension::MolarEnergy
            }
            Self::Dimensionless => Dimension::Dimensionless,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Angstrom => "angstrom",
            Self::Picometer => "pm",
            Self::Nanometer => "nm",
            Self::Meter => "m",
            Self::Degree => "degree",
            Self::Radian => "rad",
            Self::CubicAngstrom => "angstrom**3",
            Self::CubicNanometer => "nm**3",
            Self::Bar => "bar",
            Self::Atmosphere => "atm",
            Self::Pascal => "Pa",
            Self::Kilopascal => "kPa",
            Self::Megapascal => "MPa",
            Self::Kelvin => "K",
            Self::Celsius => "degC",
            Self::KilojoulePerMole => "kJ/mol",
            Self::KilocaloriePerMole => "kcal/mol",
            Self::JoulePerMole => "J/mol",
            Self::Dimensionless => "dimensionless",
        }
    }

    /// Multiplicative factor from this unit to the engine unit of its dimension.
    fn scale(self) -> f64 {
        match self {
            Self::Angstrom => 1.0,
            Self::Picometer => 1.0e-2,
            Self::Nanometer => 10.0,
            Self::Meter => 1.0e10,
            Self::Degree => 1.0,
            Self::Radian => 180.0 / std::f64::consts::PI,
            Self::CubicAngstrom => 1.0,
            Self::CubicNanometer => 1.0e3,
            Self::Bar => 1.0,
            Self::Atmosphere => 1.01325,
            Self::Pascal => 1.0e-5,
            Self::Kilopascal => 1.0e-2,
            Self::Megapascal => 10.0,
            Self::Kelvin => 1.0,
            Self::Celsius => 1.0,
            Self::KilojoulePerMole => 1.0,
            Self::KilocaloriePerMole => 4.184,
            Self::JoulePerMole => 1.0e-3,
            Self::Dimensionless => 1.0,
        }
    }

    /// Affine offset applied after scaling (only non-zero for temperature scales).
    fn offset(self) -> f64 {
        match self {
            Self::Celsius => 273.15,
            _ => 0.0,
        }
    }

    pub fn to_engine(self, value: f64) -> f64 {
        value * self.scale() + self.offset()
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        UNIT_SYMBOLS
            .get(trimmed)
            .copied()
            .ok_or_else(|| UnitError::UnknownUnit(trimmed.to_string()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A numeric value tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn angstrom(value: f64) -> Self {
        Self::new(value, Unit::Angstrom)
    }

    pub const fn degrees(value: f64) -> Self {
        Self::new(value, Unit::Degree)
    }

    pub const fn cubic_angstrom(value: f64) -> Self {
        Self::new(value, Unit::CubicAngstrom)
    }

    pub const fn bar(value: f64) -> Self {
        Self::new(value, Unit::Bar)
    }

    pub const fn kelvin(value: f64) -> Self {
        Self::new(value, Unit::Kelvin)
    }

    pub const fn kj_per_mol(value: f64) -> Self {
        Self::new(value, Unit::KilojoulePerMole)
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }
}

impl FromStr for Quantity {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (number, symbol) = trimmed
            .split_once(char::is_whitespace)
            .ok_or_else(|| UnitError::Malformed(trimmed.to_string()))?;
        let value: f64 = number
            .parse()
            .map_err(|_| UnitError::Malformed(trimmed.to_string()))?;
        let unit: Unit = symbol.parse()?;
        Ok(Self::new(value, unit))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Checks that `quantity` has the `expected` dimension and returns its value in
/// engine units.
///
/// # Arguments
///
/// * `quantity` - The quantity to validate.
/// * `expected` - The dimension the caller requires.
/// * `argument` - Name used in the error message.
///
/// # Errors
///
/// Returns [`UnitError::WrongDimension`] if the dimensions disagree.
pub fn validate(quantity: &Quantity, expected: Dimension, argument: &str) -> Result<f64, UnitError> {
    let found = quantity.dimension();
    if found != expected {
        return Err(UnitError::WrongDimension {
            argument: argument.to_string(),
            expected,
            found,
        });
    }
    Ok(quantity.unit.to_engine(quantity.value))
}

/// Validates a one-dimensional list of quantities of a fixed length.
///
/// # Errors
///
/// Returns [`UnitError::WrongShape`] if `quantities.len() != expected_len`, or
/// the first [`UnitError::WrongDimension`] encountered.
pub fn validate_list(
    quantities: &[Quantity],
    expected_len: usize,
    expected: Dimension,
    argument: &str,
) -> Result<Vec<f64>, UnitError> {
    if quantities.len() != expected_len {
        return Err(UnitError::WrongShape {
            argument: argument.to_string(),
            expected: expected_len,
            found: quantities.len(),
        });
    }
    quantities
        .iter()
        .map(|q| validate(q, expected, argument))
        .collect()
}
