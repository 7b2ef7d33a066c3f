use super::ensemble::Ensemble;
use super::error::MoveSetError;
use crate::core::models::simbox::SimBox;
use crate::core::units::{self, Dimension, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Region to which insertion trials of one species in one box are confined.
/// All lengths are in Å.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RestrictedInsertion {
    Sphere { radius: f64 },
    Cylinder { radius: f64 },
    Slitpore { z_max: f64 },
    Interface { z_min: f64, z_max: f64 },
}

/// Restrictions indexed `[box][species]`; `None` leaves a pair unrestricted.
pub type RestrictionGrid = Vec<Vec<Option<RestrictedInsertion>>>;

impl RestrictedInsertion {
    pub const KINDS: [&'static str; 4] = ["sphere", "cylinder", "slitpore", "interface"];

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Cylinder { .. } => "cylinder",
            Self::Slitpore { .. } => "slitpore",
            Self::Interface { .. } => "interface",
        }
    }

    pub fn values(&self) -> Vec<f64> {
        match *self {
            Self::Sphere { radius } | Self::Cylinder { radius } => vec![radius],
            Self::Slitpore { z_max } => vec![z_max],
            Self::Interface { z_min, z_max } => vec![z_min, z_max],
        }
    }

    /// Builds a restriction from its keyword and dimensioned values.
    pub fn from_parts(kind: &str, values: &[Quantity]) -> Result<Self, MoveSetError> {
        let expected = match kind {
            "interface" => 2,
            "sphere" | "cylinder" | "slitpore" => 1,
            other => {
                return Err(MoveSetError::RestrictedInsertion(format!(
                    "unsupported type '{}'. Supported types are: {}",
                    other,
                    Self::KINDS.join(", ")
                )));
            }
        };
        let lengths = units::validate_list(values, expected, Dimension::Length, "restricted_value")?;
        if let Some(&negative) = lengths.iter().find(|&&v| v < 0.0) {
            return Err(MoveSetError::OutOfRange {
                field: "restricted_value".to_string(),
                range: "non-negative",
                value: negative,
            });
        }

        Ok(match kind {
            "sphere" => Self::Sphere { radius: lengths[0] },
            "cylinder" => Self::Cylinder { radius: lengths[0] },
            "slitpore" => Self::Slitpore { z_max: lengths[0] },
            _ => {
                let (z_min, z_max) = (lengths[0], lengths[1]);
                if z_min >= z_max {
                    return Err(MoveSetError::RestrictedInsertion(format!(
                        "interface requires z_min < z_max, found [{z_min}, {z_max}]"
                    )));
                }
                Self::Interface { z_min, z_max }
            }
        })
    }

    /// Largest admissible value of the restriction's outer bound for `simbox`.
    pub fn bound_limit(&self, simbox: &SimBox) -> f64 {
        let e = simbox.extents();
        match self {
            Self::Sphere { .. } => e.min() / 2.0,
            Self::Cylinder { .. } => e[0].min(e[1]) / 2.0,
            Self::Slitpore { .. } | Self::Interface { .. } => e[2] / 2.0,
        }
    }

    pub fn outer_bound(&self) -> f64 {
        match *self {
            Self::Sphere { radius } | Self::Cylinder { radius } => radius,
            Self::Slitpore { z_max } | Self::Interface { z_max, .. } => z_max,
        }
    }

    pub fn fits_in(&self, simbox: &SimBox) -> bool {
        self.outer_bound() <= self.bound_limit(simbox)
    }
}

impl fmt::Display for RestrictedInsertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sphere { radius } => write!(f, "sphere, R = {radius}"),
            Self::Cylinder { radius } => write!(f, "cylinder, R = {radius}"),
            Self::Slitpore { z_max } => write!(f, "slitpore, z_max = {z_max}"),
            Self::Interface { z_min, z_max } => {
                write!(f, "interface, z_min = {z_min}, z_max = {z_max}")
            }
        }
    }
}

/// Validates parallel `[box][species]` tables of restriction types and values.
///
/// An entry with neither a type nor a value is unrestricted; an entry with only
/// one of the two is an error.
///
/// # Errors
///
/// - [`MoveSetError::RestrictedInsertion`] if the ensemble has no insertion or swap
///   moves, an entry is half-specified, or a type is unsupported.
/// - [`MoveSetError::Shape`] if either table is not `n_boxes × n_species`.
pub fn validate_restrictions<S: AsRef<str>>(
    ensemble: Ensemble,
    n_species: usize,
    restricted_type: &[Vec<Option<S>>],
    restricted_value: &[Vec<Option<Vec<Quantity>>>],
) -> Result<RestrictionGrid, MoveSetError> {
    if !ensemble.exchanges_molecules() {
        return Err(MoveSetError::RestrictedInsertion(format!(
            "only supported for gcmc, gemc and gemc_npt, not '{ensemble}'"
        )));
    }
    let n_boxes = ensemble.n_boxes();
    let expected = format!("({n_boxes}, {n_species})");
    check_outer("restricted_type", restricted_type.len(), n_boxes, &expected)?;
    check_outer("restricted_value", restricted_value.len(), n_boxes, &expected)?;

    let mut grid = Vec::with_capacity(n_boxes);
    for (ibox, (types, values)) in restricted_type.iter().zip(restricted_value).enumerate() {
        check_outer("restricted_type", types.len(), n_species, &expected)?;
        check_outer("restricted_value", values.len(), n_species, &expected)?;

        let row = types
            .iter()
            .zip(values)
            .enumerate()
            .map(|(isp, (kind, value))| match (kind, value) {
                (None, None) => Ok(None),
                (Some(kind), Some(value)) => {
                    RestrictedInsertion::from_parts(kind.as_ref(), value).map(Some)
                }
                _ => Err(MoveSetError::RestrictedInsertion(format!(
                    "box {}, species {}: restricted_type and restricted_value must both be set or both be empty",
                    ibox + 1,
                    isp + 1
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        grid.push(row);
    }
    Ok(grid)
}

fn check_outer(field: &str, found: usize, expected: usize, shape: &str) -> Result<(), MoveSetError> {
    if found != expected {
        return Err(MoveSetError::shape(
            field,
            shape.to_string(),
            format!("a list of length {found} where {expected} was required"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn len(v: f64) -> Vec<Quantity> {
        vec![Quantity::angstrom(v)]
    }

    #[test]
    fn from_parts_builds_each_geometry() {
        assert_eq!(
            RestrictedInsertion::from_parts("sphere", &len(3.0)).unwrap(),
            RestrictedInsertion::Sphere { radius: 3.0 }
        );
        assert_eq!(
            RestrictedInsertion::from_parts("slitpore", &[Quantity::new(1.0, crate::core::units::Unit::Nanometer)])
                .unwrap(),
            RestrictedInsertion::Slitpore { z_max: 10.0 }
        );
        assert_eq!(
            RestrictedInsertion::from_parts(
                "interface",
                &[Quantity::angstrom(10.0), Quantity::angstrom(20.0)]
            )
            .unwrap(),
            RestrictedInsertion::Interface { z_min: 10.0, z_max: 20.0 }
        );
    }

    #[test]
    fn from_parts_rejects_bad_kind_arity_and_dimension() {
        assert!(matches!(
            RestrictedInsertion::from_parts("cube", &len(1.0)),
            Err(MoveSetError::RestrictedInsertion(_))
        ));
        assert!(matches!(
            RestrictedInsertion::from_parts("interface", &len(1.0)),
            Err(MoveSetError::Unit(_))
        ));
        assert!(matches!(
            RestrictedInsertion::from_parts("sphere", &[Quantity::kelvin(1.0)]),
            Err(MoveSetError::Unit(_))
        ));
        assert!(matches!(
            RestrictedInsertion::from_parts(
                "interface",
                &[Quantity::angstrom(5.0), Quantity::angstrom(2.0)]
            ),
            Err(MoveSetError::RestrictedInsertion(_))
        ));
    }

    #[test]
    fn validate_restrictions_rejects_ensembles_without_insertions() {
        for ensemble in [Ensemble::Nvt, Ensemble::Npt] {
            let result = validate_restrictions(ensemble, 1, &[vec![Some("sphere")]], &[vec![Some(len(1.0))]]);
            assert!(matches!(result, Err(MoveSetError::RestrictedInsertion(_))));
        }
    }

    #[test]
    fn validate_restrictions_rejects_outer_length_mismatch_for_every_exchange_ensemble() {
        for ensemble in [Ensemble::Gcmc, Ensemble::Gemc, Ensemble::GemcNpt] {
            let n_boxes = ensemble.n_boxes();
            let types = vec![vec![None::<&str>]; n_boxes];
            let values = vec![vec![None]; n_boxes + 1];
            let result = validate_restrictions(ensemble, 1, &types, &values);
            assert!(matches!(result, Err(MoveSetError::Shape { .. })), "{ensemble}");
        }
    }

    #[test]
    fn validate_restrictions_rejects_half_specified_entries() {
        let result = validate_restrictions(
            Ensemble::Gcmc,
            2,
            &[vec![None, Some("sphere")]],
            &[vec![None, None]],
        );
        assert!(matches!(result, Err(MoveSetError::RestrictedInsertion(_))));
    }

    #[test]
    fn validate_restrictions_returns_grid_matching_input() {
        let grid = validate_restrictions(
            Ensemble::Gemc,
            2,
            &[vec![None, None], vec![None, Some("cylinder")]],
            &[vec![None, None], vec![None, Some(len(4.0))]],
        )
        .unwrap();
        assert_eq!(
            grid,
            vec![
                vec![None, None],
                vec![None, Some(RestrictedInsertion::Cylinder { radius: 4.0 })]
            ]
        );
    }

    #[test]
    fn fits_in_compares_outer_bound_with_half_box_extent() {
        let small = SimBox::from_lengths([29.84; 3]).unwrap();
        let large = SimBox::from_lengths([50.0; 3]).unwrap();

        assert!(RestrictedInsertion::Slitpore { z_max: 1.0 }.fits_in(&small));
        assert!(!RestrictedInsertion::Slitpore { z_max: 30.0 }.fits_in(&small));
        assert!(!RestrictedInsertion::Sphere { radius: 30.0 }.fits_in(&small));
        assert!(RestrictedInsertion::Interface { z_min: 10.0, z_max: 20.0 }.fits_in(&large));
        assert!(!RestrictedInsertion::Interface { z_min: 10.0, z_max: 70.0 }.fits_in(&large));

        let slab = SimBox::from_lengths([10.0, 10.0, 100.0]).unwrap();
        assert!(!RestrictedInsertion::Cylinder { radius: 6.0 }.fits_in(&slab));
        assert!(RestrictedInsertion::Slitpore { z_max: 40.0 }.fits_in(&slab));
    }
}
