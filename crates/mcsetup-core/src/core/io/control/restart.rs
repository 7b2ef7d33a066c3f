use super::error::ControlFileError;
use super::file::ControlFile;
use super::styles::RunType;
use tracing::warn;

/// Edits that turn a finished run's control file into one for its continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartPatch<'a> {
    /// Run name of the file being continued; its checkpoint is `<restart_from>.out.chk`.
    pub restart_from: &'a str,
    pub run_name: &'a str,
    pub run_type: Option<RunType>,
    /// New total run length, counted in the original file's units.
    pub run_length: Option<u64>,
}

impl ControlFile {
    /// Applies a restart patch, leaving every other line untouched.
    ///
    /// # Errors
    ///
    /// - [`ControlFileError::Malformed`] if a section that must be patched is
    ///   missing or empty.
    /// - [`ControlFileError::RestartLengthTooShort`] if the new run length is
    ///   shorter than the original.
    pub fn patch_for_restart(&self, patch: &RestartPatch<'_>) -> Result<ControlFile, ControlFileError> {
        let mut lines: Vec<String> = self.as_str().split('\n').map(str::to_string).collect();

        let run_name = section_body(&lines, "Run_Name")?;
        lines[run_name.start] = format!("{}.out", patch.run_name);

        let start_type = section_body(&lines, "Start_Type")?;
        lines[start_type.start] = format!("checkpoint {}.out.chk", patch.restart_from);
        for line in &mut lines[start_type.start + 1..start_type.end] {
            line.clear();
        }

        if let Some(run_type) = patch.run_type {
            let body = section_body(&lines, "Run_Type")?;
            let line = &lines[body.start];
            let rest = line
                .trim_start()
                .find(char::is_whitespace)
                .map_or("", |idx| &line.trim_start()[idx..]);
            lines[body.start] = format!("{run_type}{rest}");
        }

        if let Some(requested) = patch.run_length {
            let body = section_body(&lines, "Simulation_Length_Info")?;
            let (index, original) = lines[body.clone()]
                .iter()
                .enumerate()
                .find_map(|(offset, line)| {
                    let value = line.trim().strip_prefix("run ")?;
                    Some((body.start + offset, value.trim().parse::<u64>()))
                })
                .ok_or_else(|| {
                    ControlFileError::Malformed("Simulation_Length_Info has no 'run' line".to_string())
                })?;
            let original = original.map_err(|_| {
                ControlFileError::Malformed(format!("unreadable run length '{}'", lines[index].trim()))
            })?;

            if requested < original {
                return Err(ControlFileError::RestartLengthTooShort { requested, original });
            }
            if requested == original {
                warn!(
                    "Restart run length {} equals the original run length; no further steps will be run.",
                    requested
                );
            }
            lines[index] = format!("run {requested}");
        }

        Ok(ControlFile::from(lines.join("\n")))
    }
}

/// Line range of a section's body: from the line after `# <name>` up to, not
/// including, the closing separator.
fn section_body(lines: &[String], name: &str) -> Result<std::ops::Range<usize>, ControlFileError> {
    let header = format!("# {name}");
    let start = lines
        .iter()
        .position(|line| line.trim_end() == header)
        .map(|idx| idx + 1)
        .ok_or_else(|| ControlFileError::Malformed(format!("missing '{header}' section")))?;
    let end = lines[start..]
        .iter()
        .position(|line| line.starts_with('!'))
        .map_or(lines.len(), |offset| start + offset);
    if start >= end {
        return Err(ControlFileError::Malformed(format!("section '{header}' is empty")));
    }
    Ok(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::control::format::SEPARATOR;

    fn original() -> ControlFile {
        ControlFile::from(format!(
            "# Run_Name\ngemc.out\n{SEPARATOR}\n\n\
             # Start_Type\nmake_config 100\nmake_config 50\n{SEPARATOR}\n\n\
             # Run_Type\nequilibration 1000 100\n{SEPARATOR}\n\n\
             # Simulation_Length_Info\nunits steps\nprop_freq 500\ncoord_freq 5000\nrun 500\n{SEPARATOR}\n\n"
        ))
    }

    fn patch<'a>(run_type: Option<RunType>, run_length: Option<u64>) -> RestartPatch<'a> {
        RestartPatch {
            restart_from: "gemc",
            run_name: "gemc.rst.001",
            run_type,
            run_length,
        }
    }

    #[test]
    fn patch_renames_run_and_switches_to_checkpoint_start() {
        let patched = original().patch_for_restart(&patch(None, None)).unwrap();
        let text = patched.as_str();

        assert!(text.contains("# Run_Name\ngemc.rst.001.out\n"));
        assert!(text.contains("# Start_Type\ncheckpoint gemc.out.chk\n\n!"));
        assert!(text.contains("# Run_Type\nequilibration 1000 100\n"));
        assert!(text.contains("run 500\n"));
    }

    #[test]
    fn patch_replaces_only_the_run_type_keyword() {
        let patched = original()
            .patch_for_restart(&patch(Some(RunType::Production), None))
            .unwrap();
        assert!(patched.as_str().contains("# Run_Type\nproduction 1000 100\n"));
    }

    #[test]
    fn patch_extends_run_length() {
        let patched = original().patch_for_restart(&patch(None, Some(1000))).unwrap();
        assert!(patched.as_str().contains("\nrun 1000\n"));
        assert!(!patched.as_str().contains("\nrun 500\n"));
    }

    #[test]
    fn patch_accepts_equal_run_length_and_warns() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("restart.log");
        let file = std::fs::File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();

        let patched = tracing::subscriber::with_default(subscriber, || {
            original().patch_for_restart(&patch(None, Some(500)))
        })
        .unwrap();

        assert!(patched.as_str().contains("\nrun 500\n"));
        let log = std::fs::read_to_string(log_path).unwrap();
        assert!(log.contains("WARN"));
        assert!(log.contains("Restart run length 500 equals the original run length"));
    }

    #[test]
    fn patch_with_longer_run_length_does_not_warn() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("restart.log");
        let file = std::fs::File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            original().patch_for_restart(&patch(None, Some(1000)))
        })
        .unwrap();

        assert!(!std::fs::read_to_string(log_path).unwrap().contains("WARN"));
    }

    #[test]
    fn patch_rejects_shorter_run_length() {
        let err = original().patch_for_restart(&patch(None, Some(100))).unwrap_err();
        assert!(matches!(
            err,
            ControlFileError::RestartLengthTooShort {
                requested: 100,
                original: 500
            }
        ));
    }

    #[test]
    fn patch_keeps_trailing_space_of_run_type_line() {
        let file = ControlFile::from(format!(
            "# Run_Name\nnvt.out\n{SEPARATOR}\n\n# Start_Type\nmake_config 10\n{SEPARATOR}\n\n\
             # Run_Type\nequilibration 1000 \n{SEPARATOR}\n"
        ));
        let patched = file
            .patch_for_restart(&RestartPatch {
                restart_from: "nvt",
                run_name: "nvt.rst.001",
                run_type: Some(RunType::Production),
                run_length: None,
            })
            .unwrap();
        assert!(patched.as_str().contains("# Run_Type\nproduction 1000 \n"));
    }

    #[test]
    fn patch_rejects_file_without_start_type() {
        let file = ControlFile::from(format!("# Run_Name\nnvt.out\n{SEPARATOR}\n"));
        assert!(matches!(
            file.patch_for_restart(&patch(None, None)),
            Err(ControlFileError::Malformed(_))
        ));
    }

    #[test]
    fn patches_compose_across_restart_chains() {
        let first = original().patch_for_restart(&patch(None, Some(1000))).unwrap();
        let second = first
            .patch_for_restart(&RestartPatch {
                restart_from: "gemc.rst.001",
                run_name: "gemc.rst.002",
                run_type: Some(RunType::Production),
                run_length: Some(2000),
            })
            .unwrap();
        let text = second.as_str();
        assert!(text.contains("# Run_Name\ngemc.rst.002.out\n"));
        assert!(text.contains("# Start_Type\ncheckpoint gemc.rst.001.out.chk\n\n!"));
        assert!(text.contains("\nrun 2000\n"));
        assert!(text.contains("production 1000 100"));
    }
}
