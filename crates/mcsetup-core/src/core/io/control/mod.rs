//! Reading, writing and patching of engine control files (`.inp`).
//!
//! A control file is a sequence of `# Section` headers, each followed by its
//! body and closed by a [`SEPARATOR`](format::SEPARATOR) line. [`sections`] builds
//! the individual sections, [`moves`] the nested move-probability block, and
//! [`restart`] rewrites an existing file for a continuation run.

pub mod error;
pub mod file;
pub mod format;
pub mod moves;
pub mod restart;
pub mod sections;
pub mod styles;

pub use error::ControlFileError;
pub use file::ControlFile;
