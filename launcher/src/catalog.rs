//! Module catalog: the ordered set of simulations the launcher offers.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};

/// One anatomical training module.
///
/// Every field is fixed at construction except `exe_path`, which the path
/// editor may overwrite through [`Catalog::set_exe_path`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub color: String,
    pub exe_path: PathBuf,
    /// Remote icon image, used only for decoration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Ordered, id-unique list of modules. Insertion order is display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    modules: Vec<ModuleDescriptor>,
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate ids.
    pub fn new(modules: Vec<ModuleDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for module in &modules {
            if module.id.trim().is_empty() {
                bail!("module '{}' has an empty id", module.name);
            }
            if !seen.insert(module.id.as_str()) {
                bail!("duplicate module id '{}'", module.id);
            }
        }
        Ok(Self { modules })
    }

    /// The suite shipped with the launcher.
    pub fn builtin() -> Self {
        Self {
            modules: builtin_modules(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|module| module.id == id)
    }

    /// Like [`Catalog::get`], but an unknown id is an error naming the known ids.
    pub fn require(&self, id: &str) -> Result<&ModuleDescriptor> {
        self.get(id).ok_or_else(|| {
            anyhow!(
                "unknown module '{id}' (known: {})",
                self.ids().collect::<Vec<_>>().join(", ")
            )
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|module| module.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Overwrite the executable path of `id`. The new path is not checked.
    pub fn set_exe_path(&mut self, id: &str, exe_path: PathBuf) -> Result<()> {
        let known = self.ids().collect::<Vec<_>>().join(", ");
        let module = self
            .modules
            .iter_mut()
            .find(|module| module.id == id)
            .ok_or_else(|| anyhow!("unknown module '{id}' (known: {known})"))?;
        module.exe_path = exe_path;
        Ok(())
    }
}

fn builtin_module(
    id: &str,
    name: &str,
    icon: &str,
    description: &str,
    color: &str,
) -> ModuleDescriptor {
    ModuleDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        exe_path: PathBuf::from("simulations")
            .join(name)
            .join(format!("{name}.exe")),
        icon_url: None,
    }
}

fn builtin_modules() -> Vec<ModuleDescriptor> {
    vec![
        builtin_module("heart", "Heart", "❤️", "Cardiac Surgery VR", "#D64545"),
        builtin_module("liver", "Liver", "🟤", "Hepatic Procedures VR", "#E85D75"),
        builtin_module("tooth", "Tooth", "🦷", "Dental Training VR", "#4A90E2"),
        builtin_module("flow", "Flow", "💧", "Vascular Flow VR", "#00BCD4"),
        builtin_module("nose", "Nose", "👃", "ENT Surgery VR", "#F5A623"),
        builtin_module("abdomen", "Abdomen", "🩺", "Abdominal Trauma VR", "#7B68EE"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::descriptor;

    #[test]
    fn builtin_catalog_has_unique_ids_in_display_order() {
        let catalog = Catalog::builtin();
        let rebuilt = Catalog::new(catalog.iter().cloned().collect()).expect("valid");
        assert_eq!(rebuilt, catalog);
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(
            ids,
            vec!["heart", "liver", "tooth", "flow", "nose", "abdomen"]
        );
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let err = Catalog::new(vec![
            descriptor("heart", "/a"),
            descriptor("liver", "/b"),
            descriptor("heart", "/c"),
        ])
        .expect_err("duplicate");
        assert!(err.to_string().contains("duplicate module id 'heart'"));
    }

    #[test]
    fn new_rejects_empty_id() {
        let err = Catalog::new(vec![descriptor(" ", "/a")]).expect_err("empty id");
        assert!(err.to_string().contains("empty id"));
    }

    #[test]
    fn set_exe_path_overwrites_only_target() {
        let mut catalog = Catalog::new(vec![descriptor("heart", "/a"), descriptor("liver", "/b")])
            .expect("catalog");
        catalog
            .set_exe_path("liver", PathBuf::from("/new/Liver.exe"))
            .expect("set");
        assert_eq!(
            catalog.get("liver").expect("liver").exe_path,
            PathBuf::from("/new/Liver.exe")
        );
        assert_eq!(
            catalog.get("heart").expect("heart").exe_path,
            PathBuf::from("/a")
        );
    }

    #[test]
    fn unknown_id_lists_known_ids() {
        let mut catalog = Catalog::new(vec![descriptor("heart", "/a")]).expect("catalog");
        let err = catalog
            .set_exe_path("spleen", PathBuf::from("/x"))
            .expect_err("unknown");
        assert_eq!(err.to_string(), "unknown module 'spleen' (known: heart)");
        assert!(catalog.require("spleen").is_err());
    }
}
