//! # Core Models Module
//!
//! Data structures describing the simulated system as the control-file writer
//! sees it. Topology construction and coordinate handling live outside this
//! library; these models only carry what the writer reads.
//!
//! ## Key Components
//!
//! - [`species`] - The [`SpeciesTopology`](species::SpeciesTopology) seam (atom and bond counts)
//!   and the concrete [`Species`](species::Species) record
//! - [`simbox`] - Box geometry as a 3×3 matrix, with cubic/orthogonal/triclinic classification
//! - [`system`] - Boxes, species, and per-box molecule counts, validated for consistency

pub mod simbox;
pub mod species;
pub mod system;
