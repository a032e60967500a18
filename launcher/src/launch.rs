//! Launch orchestration for `launcher launch` and the session `launch` command.

use anyhow::Result;
use tracing::info;

use crate::catalog::{Catalog, ModuleDescriptor};
use crate::exit_codes;
use crate::io::process::{LaunchOutcome, launch};
use crate::io::resolve::resolve;

/// Launch the module `id` if its executable resolves.
///
/// A module that is not ready is reported as [`LaunchOutcome::NotFound`]
/// without attempting a spawn. Unknown ids are errors.
pub fn launch_module(catalog: &Catalog, id: &str) -> Result<LaunchOutcome> {
    let module = catalog.require(id)?;
    if !resolve(module).is_ready() {
        info!(module = id, path = %module.exe_path.display(), "module not ready, launch skipped");
        return Ok(LaunchOutcome::NotFound);
    }
    Ok(launch(&module.exe_path))
}

/// Operator notice for a launch outcome.
pub fn describe_outcome(module: &ModuleDescriptor, outcome: &LaunchOutcome) -> String {
    match outcome {
        LaunchOutcome::Success(process) => format!(
            "Launching '{}' (pid {}, cwd {})",
            module.name,
            process.pid,
            process.working_dir.display()
        ),
        LaunchOutcome::NotFound => format!(
            "'{}' not found at {}. Use set-path or browse to set the correct location.",
            module.name,
            module.exe_path.display()
        ),
        LaunchOutcome::SpawnFailure(reason) => {
            format!("Failed to launch '{}': {reason}", module.name)
        }
    }
}

pub fn exit_code(outcome: &LaunchOutcome) -> i32 {
    match outcome {
        LaunchOutcome::Success(_) => exit_codes::OK,
        LaunchOutcome::NotFound => exit_codes::NOT_FOUND,
        LaunchOutcome::SpawnFailure(_) => exit_codes::SPAWN_FAILED,
    }
}
