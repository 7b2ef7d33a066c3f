//! Input/output for the files handed to the simulation engine.
//!
//! All engine inputs share the [`traits::EngineInputFile`] interface; the only
//! format implemented so far is the control file in [`control`].

pub mod control;
pub mod traits;
