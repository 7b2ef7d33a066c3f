use super::error::WorkflowError;
use super::write::sanitize_run_name;
use crate::core::io::control::restart::RestartPatch;
use crate::core::io::control::styles::RunType;
use crate::core::io::control::{ControlFile, ControlFileError};
use crate::core::io::traits::EngineInputFile;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

const RESTART_TAG: &str = ".rst.";
const MAX_RESTART_ITERATION: u32 = 999;

/// Continuation run settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestartRequest {
    /// Run to continue. When absent, the single run whose `.inp` files are in
    /// the directory is used, continuing from its latest restart.
    pub restart_from: Option<String>,
    /// When absent or equal to `restart_from`, the next `<base>.rst.NNN` name.
    pub run_name: Option<String>,
    pub run_type: Option<RunType>,
    pub run_length: Option<u64>,
}

/// Reads `<dir>/<restart_from>.inp` and returns it rewritten for a
/// continuation run, together with the resolved run name.
///
/// # Errors
///
/// Returns [`ControlFileError::MissingRestartFile`] (wrapped) naming the
/// expected path when the source file does not exist, and otherwise any error
/// from reading or patching it.
#[instrument(skip_all, name = "generate_restart_input", fields(dir = %dir.display()))]
pub fn generate_restart_input(dir: &Path, request: &RestartRequest) -> Result<(String, String), WorkflowError> {
    let restart_from = match &request.restart_from {
        Some(name) => name.clone(),
        None => find_restart_source(dir)?,
    };
    let run_name = match request.run_name.as_deref() {
        Some(name) if name != restart_from => sanitize_run_name(name)?,
        _ => next_restart_name(&restart_from)?,
    };

    let source = dir.join(format!("{restart_from}.inp"));
    if !source.is_file() {
        return Err(ControlFileError::MissingRestartFile { path: source }.into());
    }
    let original = ControlFile::read_from_path(&source).map_err(|source_err| WorkflowError::File {
        path: source.clone(),
        source: source_err,
    })?;

    let patched = original.patch_for_restart(&RestartPatch {
        restart_from: &restart_from,
        run_name: &run_name,
        run_type: request.run_type,
        run_length: request.run_length,
    })?;
    Ok((run_name, patched.into_string()))
}

/// Writes the continuation control file to `<dir>/<run_name>.inp`.
///
/// # Return
///
/// The path of the written file.
#[instrument(skip_all, name = "write_restart_input", fields(dir = %dir.display()))]
pub fn write_restart_input(dir: &Path, request: &RestartRequest) -> Result<PathBuf, WorkflowError> {
    let (run_name, text) = generate_restart_input(dir, request)?;
    let path = dir.join(format!("{run_name}.inp"));
    ControlFile::from(text)
        .write_to_path(&path)
        .map_err(|source| WorkflowError::File {
            path: path.clone(),
            source,
        })?;
    info!(path = %path.display(), "Wrote restart control file.");
    Ok(path)
}

/// Next name in a restart chain: `run` becomes `run.rst.001`, and
/// `run.rst.001` becomes `run.rst.002`.
pub fn next_restart_name(restart_from: &str) -> Result<String, ControlFileError> {
    match split_restart_name(restart_from) {
        Some((base, iteration)) if iteration >= MAX_RESTART_ITERATION => {
            Err(ControlFileError::invalid(
                "run_name",
                format!("maximum number of restart iterations ({MAX_RESTART_ITERATION}) exceeded for '{base}'"),
            ))
        }
        Some((base, iteration)) => Ok(format!("{base}{RESTART_TAG}{:03}", iteration + 1)),
        None => Ok(format!("{restart_from}{RESTART_TAG}001")),
    }
}

/// Splits `base.rst.NNN` into `base` and `NNN`.
fn split_restart_name(name: &str) -> Option<(&str, u32)> {
    let (base, suffix) = name.rsplit_once(RESTART_TAG)?;
    if suffix.len() != 3 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((base, suffix.parse().ok()?))
}

/// Picks the run to continue from the `.inp` files in `dir`: all files must
/// belong to one run, and the latest restart in its chain wins.
fn find_restart_source(dir: &Path) -> Result<String, WorkflowError> {
    let entries = fs::read_dir(dir).map_err(|e| WorkflowError::File {
        path: dir.to_path_buf(),
        source: e.into(),
    })?;
    let mut stems: Vec<String> = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| WorkflowError::File {
                path: dir.to_path_buf(),
                source: e.into(),
            })?
            .path();
        if path.extension().is_some_and(|ext| ext == "inp") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
    }
    stems.sort();

    let Some(first) = stems.first() else {
        return Err(ControlFileError::MissingParameter(format!(
            "no previous input files found in '{}'",
            dir.display()
        ))
        .into());
    };
    let base = split_restart_name(first).map_or(first.as_str(), |(base, _)| base);
    let chain_prefix = format!("{base}{RESTART_TAG}");
    if !stems.iter().all(|s| s == base || s.starts_with(&chain_prefix)) {
        return Err(ControlFileError::MissingParameter(format!(
            "multiple runs found in '{}' ({}); specify the run to restart from",
            dir.display(),
            stems.join(", ")
        ))
        .into());
    }
    Ok(stems.last().map_or_else(|| base.to_string(), Clone::clone))
}
