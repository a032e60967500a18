//! Detached launch of module executables.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::{debug, error, info, instrument, warn};

/// A module executable that was spawned successfully.
///
/// The launcher never waits on `child`; callers may keep or drop it.
#[derive(Debug)]
pub struct LaunchedProcess {
    pub pid: u32,
    pub working_dir: PathBuf,
    pub child: Child,
}

/// Result of [`launch`].
#[derive(Debug)]
pub enum LaunchOutcome {
    Success(LaunchedProcess),
    /// No file at the path when the launch was attempted.
    NotFound,
    /// The OS refused to create the process. Carries the platform error text.
    SpawnFailure(String),
}

/// Directory the executable must run from so it finds its sibling data
/// directories.
pub fn working_dir_for(exe_path: &Path) -> PathBuf {
    match exe_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Spawn `exe_path` with no arguments, running from its parent directory.
///
/// Existence is re-checked here even if the caller already resolved the path;
/// a file removed in between yields [`LaunchOutcome::NotFound`]. The child is
/// not waited on and its stdout/stderr are inherited, not captured.
#[instrument(skip_all, fields(exe = %exe_path.display()))]
pub fn launch(exe_path: &Path) -> LaunchOutcome {
    if !exe_path.exists() {
        warn!("executable missing at launch time");
        return LaunchOutcome::NotFound;
    }

    // Relative program paths combined with `current_dir` resolve differently
    // across platforms, so spawn by absolute path.
    let exe_path = match std::path::absolute(exe_path) {
        Ok(path) => path,
        Err(e) => {
            error!(err = %e, "failed to absolutize executable path");
            return LaunchOutcome::SpawnFailure(e.to_string());
        }
    };
    let working_dir = working_dir_for(&exe_path);

    let mut cmd = Command::new(&exe_path);
    cmd.current_dir(&working_dir).stdin(Stdio::null());

    debug!(working_dir = %working_dir.display(), "spawning module executable");
    match cmd.spawn() {
        Ok(child) => {
            let pid = child.id();
            info!(pid, working_dir = %working_dir.display(), "module launched");
            LaunchOutcome::Success(LaunchedProcess {
                pid,
                working_dir,
                child,
            })
        }
        // ENOENT also covers a missing interpreter or loader; only a missing
        // file counts as not found.
        Err(e) if e.kind() == ErrorKind::NotFound && !exe_path.exists() => {
            warn!(err = %e, "executable disappeared before spawn");
            LaunchOutcome::NotFound
        }
        Err(e) => {
            error!(err = %e, "failed to spawn module executable");
            LaunchOutcome::SpawnFailure(e.to_string())
        }
    }
}
