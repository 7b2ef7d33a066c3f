//! # Move Set Module
//!
//! Derivation and validation of the Monte Carlo move configuration.
//!
//! A [`MoveSet`](moveset::MoveSet) is created from an [`Ensemble`](ensemble::Ensemble)
//! and the species topologies. Construction picks ensemble presets for the
//! move-class probabilities, then adapts per-species parameters to what each
//! species can physically do. Afterwards, every field can be changed through a
//! typed setter or through [`MoveSet::set_field`](moveset::MoveSet::set_field), and
//! both paths run the same checks:
//!
//! - **Range** - probabilities in `[0, 1]`, angles in `[0°, 360°]`, lengths and volumes non-negative
//! - **Shape** - `[box][species]`, `[species]` or `[box]` as appropriate for the field
//! - **Units** - dimensioned fields only accept quantities of the right dimension
//! - **Ensemble** - volume, insertion and swap probabilities must match the ensemble
//!
//! Restricted insertions ([`restricted`]) confine insertion trials of a species
//! to a sphere, cylinder, slit pore or interface region.

pub mod ensemble;
pub mod error;
pub mod fields;
pub mod moveset;
pub mod restricted;
