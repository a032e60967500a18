//! Asset kinds and the deterministic layout of staged module assets.
//!
//! Staging never writes these files. The paths are where a module's assets
//! would live once staged, derived only from the asset root and module id.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Kinds of asset staged for every module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Scene,
    Mesh,
    Geometry,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] = [AssetKind::Scene, AssetKind::Mesh, AssetKind::Geometry];

    pub fn tag(self) -> &'static str {
        match self {
            AssetKind::Scene => "scene",
            AssetKind::Mesh => "mesh",
            AssetKind::Geometry => "geometry",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AssetKind::Scene => "unity",
            AssetKind::Mesh => "obj",
            AssetKind::Geometry => "glb",
        }
    }
}

/// Local locations produced by one completed staging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedAssetSet {
    pub module_id: String,
    pub assets: BTreeMap<AssetKind, PathBuf>,
}

impl StagedAssetSet {
    pub fn get(&self, kind: AssetKind) -> Option<&Path> {
        self.assets.get(&kind).map(PathBuf::as_path)
    }
}

/// Build the asset set for `module_id` under `asset_root`.
///
/// Layout: `<asset_root>/<id>/<id>_<tag>.<ext>`, one entry per [`AssetKind`].
pub fn staged_asset_set(asset_root: &Path, module_id: &str) -> StagedAssetSet {
    let module_dir = asset_root.join(module_id);
    let assets = AssetKind::ALL
        .into_iter()
        .map(|kind| {
            let file = format!("{module_id}_{}.{}", kind.tag(), kind.extension());
            (kind, module_dir.join(file))
        })
        .collect();
    StagedAssetSet {
        module_id: module_id.to_string(),
        assets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_path_per_kind_named_after_module() {
        let set = staged_asset_set(Path::new("cache"), "liver");
        assert_eq!(set.assets.len(), AssetKind::ALL.len());
        for kind in AssetKind::ALL {
            let path = set.get(kind).expect("kind present");
            assert!(path.to_string_lossy().contains("liver"));
        }
        assert_eq!(
            set.get(AssetKind::Mesh),
            Some(Path::new("cache/liver/liver_mesh.obj"))
        );
    }

    #[test]
    fn layout_is_deterministic() {
        let a = staged_asset_set(Path::new("/tmp/assets"), "heart");
        let b = staged_asset_set(Path::new("/tmp/assets"), "heart");
        assert_eq!(a, b);
        assert_ne!(a, staged_asset_set(Path::new("/tmp/assets"), "nose"));
    }
}
