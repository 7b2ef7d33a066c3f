use clap::{Args, Parser, Subcommand};
use mcsetup::core::io::control::styles::RunType;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "mcsetup - Builds validated Monte Carlo move sets and writes engine control files from a TOML run description.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write `<run_name>.inp` for a new simulation.
    Write(WriteArgs),
    /// Write the control file that continues a finished run from its checkpoint.
    Restart(RestartArgs),
    /// Print the move set derived from a run description.
    Moves(MovesArgs),
}

/// Arguments for the `write` subcommand.
#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Path to the run description in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Directory the control file is written to.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Override the run name from the config file.
    #[arg(short = 'n', long, value_name = "NAME")]
    pub run_name: Option<String>,

    /// Override the seeds from the config file.
    #[arg(long, num_args = 2, value_names = ["SEED1", "SEED2"], allow_negative_numbers = true)]
    pub seeds: Option<Vec<i64>>,

    /// Override any value from the config file (e.g., -S run.run-length=5000 -S moves.prob_swap=0.2).
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `restart` subcommand.
#[derive(Args, Debug)]
pub struct RestartArgs {
    /// Run to continue. Defaults to the latest run found in the directory.
    #[arg(long = "from", value_name = "NAME")]
    pub restart_from: Option<String>,

    /// Name of the continuation run. Defaults to the next `<run>.rst.NNN`.
    #[arg(long = "name", value_name = "NAME")]
    pub run_name: Option<String>,

    /// Switch the run type (equilibration or production).
    #[arg(long, value_name = "TYPE")]
    pub run_type: Option<RunType>,

    /// New total run length, in the units of the original file.
    #[arg(long = "length", value_name = "N")]
    pub run_length: Option<u64>,

    /// Directory holding the previous control files.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub dir: PathBuf,
}

/// Arguments for the `moves` subcommand.
#[derive(Args, Debug)]
pub struct MovesArgs {
    /// Path to the run description in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override any value from the config file.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn write_defaults_output_dir_to_current_directory() {
        let cli = Cli::parse_from(["mcsetup", "write", "-c", "run.toml"]);
        match cli.command {
            Commands::Write(args) => {
                assert_eq!(args.config, PathBuf::from("run.toml"));
                assert_eq!(args.output_dir, PathBuf::from("."));
                assert!(args.set_values.is_empty());
                assert!(args.seeds.is_none());
            }
            other => panic!("expected write, got {other:?}"),
        }
    }

    #[test]
    fn write_collects_repeated_set_values_and_seeds() {
        let cli = Cli::parse_from([
            "mcsetup",
            "write",
            "-c",
            "run.toml",
            "--seeds",
            "11",
            "22",
            "-S",
            "run.run-length=100",
            "-S",
            "moves.prob_swap=0.2",
        ]);
        let Commands::Write(args) = cli.command else {
            panic!("expected write");
        };
        assert_eq!(args.seeds, Some(vec![11, 22]));
        assert_eq!(args.set_values, ["run.run-length=100", "moves.prob_swap=0.2"]);
    }

    #[test]
    fn restart_parses_run_type_keyword() {
        let cli = Cli::parse_from([
            "mcsetup",
            "restart",
            "--from",
            "gemc",
            "--run-type",
            "production",
            "--length",
            "2000",
        ]);
        let Commands::Restart(args) = cli.command else {
            panic!("expected restart");
        };
        assert_eq!(args.restart_from.as_deref(), Some("gemc"));
        assert_eq!(args.run_type, Some(RunType::Production));
        assert_eq!(args.run_length, Some(2000));
        assert!(args.run_name.is_none());
    }

    #[test]
    fn restart_rejects_unknown_run_type() {
        assert!(Cli::try_parse_from(["mcsetup", "restart", "--run-type", "sprint"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["mcsetup", "-q", "-v", "moves", "-c", "run.toml"]).is_err());
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::parse_from(["mcsetup", "moves", "-c", "run.toml", "-vv", "--log-file", "out.log"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, Some(PathBuf::from("out.log")));
    }
}
