use crate::cli::WriteArgs;
use crate::config::PartialRunDescription;
use crate::error::{CliError, Result};
use mcsetup::workflows;
use tracing::info;

pub fn run(args: WriteArgs) -> Result<()> {
    let partial = PartialRunDescription::from_file(&args.config)?;
    info!("Merging run description with command-line overrides...");
    let description = partial.merge_with_cli(&args)?;

    if !args.output_dir.is_dir() {
        return Err(CliError::Argument(format!(
            "Output directory '{}' does not exist",
            args.output_dir.display()
        )));
    }

    info!(
        "Writing control file for the '{}' ensemble...",
        description.moves.ensemble()
    );
    let path = workflows::write::write_input(
        &args.output_dir,
        &description.system,
        &description.moves,
        &description.run,
    )?;

    println!("Control file written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const NVT: &str = r#"
ensemble = "nvt"

[[species]]
name = "methane"
n-atoms = 1

[[boxes]]
lengths = [30.0, 30.0, 30.0]
mols-to-add = [100]

[run]
run-name = "methane nvt"
run-type = "equilibration"
run-length = 500
temperature = "300 K"
seeds = [11, 22]
"#;

    fn args(config: PathBuf, output_dir: PathBuf) -> WriteArgs {
        WriteArgs {
            config,
            output_dir,
            run_name: None,
            seeds: None,
            set_values: Vec::new(),
        }
    }

    #[test]
    fn writes_control_file_named_after_run() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("run.toml");
        fs::write(&config, NVT).unwrap();

        run(args(config, dir.path().to_path_buf())).unwrap();

        let text = fs::read_to_string(dir.path().join("methane_nvt.inp")).unwrap();
        assert!(text.starts_with("# Run_Name\nmethane_nvt.out\n"));
        assert!(text.contains("# Sim_Type\nnvt_mc\n"));
        assert!(text.contains("# Seed_Info\n11 22\n"));
        assert!(text.contains("methane.mcf 100\n"));
    }

    #[test]
    fn missing_output_directory_is_an_argument_error() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("run.toml");
        fs::write(&config, NVT).unwrap();

        let result = run(args(config, dir.path().join("missing")));
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = run(args(dir.path().join("absent.toml"), dir.path().to_path_buf()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
