//! # Workflows Module
//!
//! High-level entry points that turn a [`System`](crate::core::models::system::System),
//! a [`MoveSet`](crate::core::moves::moveset::MoveSet) and a [`RunConfig`](config::RunConfig)
//! into engine control files.
//!
//! - **New runs** ([`write`]) - [`generate_input`](write::generate_input) renders the
//!   complete control file; [`write_input`](write::write_input) also stores it as
//!   `<run_name>.inp`. All inputs are validated before any text is produced.
//! - **Continuation runs** ([`restart`]) - [`generate_restart_input`](restart::generate_restart_input)
//!   and [`write_restart_input`](restart::write_restart_input) patch a previous
//!   control file to start from its checkpoint.

pub mod config;
pub mod error;
pub mod restart;
pub mod write;
