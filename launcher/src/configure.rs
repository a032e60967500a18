//! Executable path editing for `set-path` and `browse`.
//!
//! Edits live in the in-memory [`Catalog`] only. They are visible to the next
//! readiness check or launch and are lost when the process exits.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::Catalog;
use crate::io::chooser::{ChooseRequest, ExtensionFilter, FileChooser};

/// Replace the executable path of `id` without validating `new_path`.
pub fn set_path(catalog: &mut Catalog, id: &str, new_path: impl Into<PathBuf>) -> Result<()> {
    let new_path = new_path.into();
    catalog.set_exe_path(id, new_path.clone())?;
    info!(module = id, path = %new_path.display(), "executable path updated");
    Ok(())
}

/// Let the operator pick a new executable for `id` through `chooser`.
///
/// Starts in the directory of the current path (or the process working
/// directory). Returns the new path, or `None` if the selection was cancelled,
/// in which case the catalog is unchanged.
pub fn browse<C: FileChooser + ?Sized>(
    catalog: &mut Catalog,
    id: &str,
    chooser: &mut C,
    filter: &ExtensionFilter,
) -> Result<Option<PathBuf>> {
    let module = catalog.require(id)?;
    let start_dir = match module.exe_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().context("read current directory")?,
    };
    let request = ChooseRequest {
        title: format!("Locate {} executable", module.name),
        start_dir,
        filter: filter.clone(),
    };

    let Some(chosen) = chooser.choose(&request)? else {
        info!(module = id, "path selection cancelled");
        return Ok(None);
    };
    set_path(catalog, id, chosen.as_path())?;
    Ok(Some(chosen))
}

/// Shorthand used by the CLI `--exe` override.
pub fn override_path(catalog: &mut Catalog, id: &str, exe: Option<&Path>) -> Result<()> {
    match exe {
        Some(path) => set_path(catalog, id, path),
        None => Ok(()),
    }
}
