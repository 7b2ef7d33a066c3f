//! # mcsetup Core Library
//!
//! Prepares input for a Monte Carlo molecular simulation engine: derives the
//! move configuration for a statistical-mechanical ensemble and writes the
//! engine's sectioned text control file.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers:
//!
//! - **[`core`]: The Foundation.** Unit-checked quantities (`units`), the simulated
//!   system (`models`), the Monte Carlo move set with its validation rules (`moves`),
//!   and the control-file text protocol (`io`).
//!
//! - **[`workflows`]: The Public API.** Ties the `core` pieces together to produce a
//!   complete control file for a new run, or to patch an existing one into a
//!   restart from its checkpoint.

pub mod core;
pub mod workflows;
