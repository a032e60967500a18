//! Test-only helpers for constructing modules, catalogs and executables.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::catalog::{Catalog, ModuleDescriptor};
use crate::io::chooser::{ChooseRequest, FileChooser};

/// Create a deterministic module whose name equals its id.
pub fn descriptor(id: &str, exe_path: impl AsRef<Path>) -> ModuleDescriptor {
    ModuleDescriptor {
        id: id.to_string(),
        name: id.to_string(),
        icon: "🧪".to_string(),
        description: format!("{id} module"),
        color: "#4A90E2".to_string(),
        exe_path: exe_path.as_ref().to_path_buf(),
        icon_url: None,
    }
}

/// Build a catalog from modules known to have unique ids.
pub fn catalog_of(modules: Vec<ModuleDescriptor>) -> Catalog {
    Catalog::new(modules).expect("test catalog ids must be unique")
}

/// Write an executable `#!/bin/sh` script at `dir/name` and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(dir).expect("create script dir");
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

/// Scratch directory holding `<dir_name>/<file_name>` as an executable script.
#[cfg(unix)]
pub fn scratch_module(dir_name: &str, file_name: &str, body: &str) -> (tempfile::TempDir, PathBuf) {
    let temp = tempfile::tempdir().expect("tempdir");
    let exe = write_script(&temp.path().join(dir_name), file_name, body);
    (temp, exe)
}

/// Chooser that replays queued answers and records every request.
///
/// Once the queue is empty every further selection is cancelled.
#[derive(Debug, Default)]
pub struct ScriptedChooser {
    answers: VecDeque<Option<PathBuf>>,
    pub requests: Vec<ChooseRequest>,
}

impl ScriptedChooser {
    pub fn new(answers: Vec<Option<PathBuf>>) -> Self {
        Self {
            answers: answers.into(),
            requests: Vec::new(),
        }
    }
}

impl FileChooser for ScriptedChooser {
    fn choose(&mut self, request: &ChooseRequest) -> Result<Option<PathBuf>> {
        self.requests.push(request.clone());
        Ok(self.answers.pop_front().flatten())
    }
}
