use crate::cli::MovesArgs;
use crate::config::PartialRunDescription;
use crate::error::Result;
use tracing::info;

pub fn run(args: MovesArgs) -> Result<()> {
    let partial = PartialRunDescription::from_file(&args.config)?;
    let moves = partial.into_move_set(&args.set_values)?;
    info!(
        "Derived move set for {} species in the '{}' ensemble.",
        moves.n_species(),
        moves.ensemble()
    );
    println!("{}", moves);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::tempdir;

    const GEMC: &str = r#"
ensemble = "gemc"

[[species]]
name = "propane"
n-atoms = 3
n-bonds = 2
"#;

    #[test]
    fn prints_move_set_without_boxes_or_run_section() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("moves.toml");
        fs::write(&config, GEMC).unwrap();

        let args = MovesArgs {
            config,
            set_values: vec!["moves.cbmc_n_insert=12".to_string()],
        };
        assert!(run(args).is_ok());
    }

    #[test]
    fn rejects_override_illegal_for_ensemble() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("moves.toml");
        fs::write(&config, GEMC).unwrap();

        let args = MovesArgs {
            config,
            set_values: vec!["moves.prob_insert=0.3".to_string()],
        };
        assert!(matches!(run(args), Err(CliError::Core(_))));
    }
}
