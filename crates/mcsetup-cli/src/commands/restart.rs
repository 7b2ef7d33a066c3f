use crate::cli::RestartArgs;
use crate::error::{CliError, Result};
use mcsetup::workflows::restart::{self, RestartRequest};
use tracing::info;

pub fn run(args: RestartArgs) -> Result<()> {
    if !args.dir.is_dir() {
        return Err(CliError::Argument(format!(
            "Directory '{}' does not exist",
            args.dir.display()
        )));
    }

    let request = RestartRequest {
        restart_from: args.restart_from,
        run_name: args.run_name,
        run_type: args.run_type,
        run_length: args.run_length,
    };
    info!("Patching previous control file in {:?}...", &args.dir);
    let path = restart::write_restart_input(&args.dir, &request)?;

    println!("Restart control file written to: {}", path.display());
    Ok(())
}
