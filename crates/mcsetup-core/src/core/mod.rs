//! # Core Module
//!
//! Building blocks shared by every workflow.
//!
//! - **Units** ([`units`]) - Quantities with units and their conversion to engine units
//! - **System** ([`models`]) - Species, simulation boxes and starting molecule counts
//! - **Moves** ([`moves`]) - Ensembles, move-set derivation, mutation and validation
//! - **File I/O** ([`io`]) - Control-file sections, the move-probability block and restart patching

pub mod io;
pub mod models;
pub mod moves;
pub mod units;
