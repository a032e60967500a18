//! Launcher configuration (optional TOML file passed with `--config`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ModuleDescriptor};

/// Launcher configuration (TOML).
///
/// Every field is optional in the file. The launcher only reads this file;
/// executable paths edited during a session are never written back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherConfig {
    /// Extension offered by the executable file chooser (without the dot).
    pub exe_extension: String,

    pub staging: StagingConfig,

    pub icons: IconConfig,

    /// Replaces the built-in catalog when non-empty.
    pub modules: Vec<ModuleDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StagingConfig {
    /// Delay before each progress step. A run always takes 100 steps.
    pub tick_ms: u64,

    /// Root of the synthesized local asset locations.
    pub asset_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IconConfig {
    /// Cap on a single icon fetch, after which it is abandoned.
    pub timeout_secs: u64,

    pub user_agent: String,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            asset_root: PathBuf::from("cache"),
        }
    }
}

impl StagingConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            user_agent: concat!("vr-suite-launcher/", env!("CARGO_PKG_VERSION")).to_string(),
            system_proxy: true,
        }
    }
}

impl IconConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            exe_extension: "exe".to_string(),
            staging: StagingConfig::default(),
            icons: IconConfig::default(),
            modules: Vec::new(),
        }
    }
}

impl LauncherConfig {
    pub fn validate(&self) -> Result<()> {
        let extension = self.exe_extension.trim();
        if extension.is_empty() || extension.contains('.') {
            return Err(anyhow!(
                "exe_extension must be a non-empty extension without dots"
            ));
        }
        if self.staging.asset_root.as_os_str().is_empty() {
            return Err(anyhow!("staging.asset_root must be non-empty"));
        }
        if self.icons.timeout_secs == 0 {
            return Err(anyhow!("icons.timeout_secs must be > 0"));
        }
        if self.icons.user_agent.trim().is_empty() {
            return Err(anyhow!("icons.user_agent must be non-empty"));
        }
        if !self.modules.is_empty() {
            Catalog::new(self.modules.clone()).context("modules")?;
        }
        Ok(())
    }

    /// Catalog for this session: the configured modules, or the built-in suite.
    pub fn catalog(&self) -> Result<Catalog> {
        if self.modules.is_empty() {
            return Ok(Catalog::builtin());
        }
        Catalog::new(self.modules.clone())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LauncherConfig::default()`.
pub fn load_config(path: &Path) -> Result<LauncherConfig> {
    if !path.exists() {
        let cfg = LauncherConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LauncherConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate().with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &LauncherConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
