//! Readiness checks against the local filesystem.
//!
//! Nothing is cached: every call looks at the path currently configured, so a
//! path edit is visible to the very next check.

use std::path::Path;

use tracing::debug;

use crate::catalog::{Catalog, ModuleDescriptor};
use crate::core::types::Readiness;

/// Readiness of a single path. Absence is an expected outcome, not an error.
pub fn resolve_path(path: &Path) -> Readiness {
    if path.exists() {
        Readiness::Ready
    } else {
        Readiness::Missing
    }
}

pub fn resolve(module: &ModuleDescriptor) -> Readiness {
    let readiness = resolve_path(&module.exe_path);
    debug!(module = %module.id, path = %module.exe_path.display(), ?readiness, "resolved module");
    readiness
}

/// Readiness of every module, in catalog order.
pub fn resolve_all(catalog: &Catalog) -> Vec<(&ModuleDescriptor, Readiness)> {
    catalog.iter().map(|module| (module, resolve(module))).collect()
}
