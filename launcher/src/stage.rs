//! Simulated asset staging.
//!
//! Each [`Stager::start`] spawns one worker thread that counts progress from 1
//! to 100, sleeping one tick before every step, then reports the module's
//! [`StagedAssetSet`]. Workers report over a channel owned by the returned
//! [`StageRun`]; the controller drains it with [`StageRun::poll`] or blocks in
//! [`StageRun::wait`]. Runs are independent: nothing prevents several runs
//! for the same module, and a run cannot be cancelled. Dropping a run makes
//! its worker stop at the next step.
//!
//! No bytes are transferred. This is the seam a real asset fetch would fill.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info};

use crate::core::assets::{AssetKind, StagedAssetSet, staged_asset_set};
use crate::core::types::{PROGRESS_COMPLETE, StagingState};
use crate::io::config::StagingConfig;

/// Notification sent from a staging worker to its controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageEvent {
    Progress(u8),
    Completed(StagedAssetSet),
}

/// Everything a finished run reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub module_id: String,
    /// Every progress value received, in order.
    pub progress: Vec<u8>,
    pub assets: StagedAssetSet,
}

/// Starts staging runs with a fixed cadence and asset root.
#[derive(Debug, Clone)]
pub struct Stager {
    tick: Duration,
    asset_root: PathBuf,
}

impl Stager {
    pub fn new(tick: Duration, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            tick,
            asset_root: asset_root.into(),
        }
    }

    pub fn from_config(config: &StagingConfig) -> Self {
        Self::new(config.tick(), config.asset_root.clone())
    }

    /// Start a new, independent run for `module_id`.
    pub fn start(&self, module_id: &str) -> Result<StageRun> {
        let (tx, rx) = mpsc::channel();
        let tick = self.tick;
        let asset_root = self.asset_root.clone();
        let worker_id = module_id.to_string();
        let worker = thread::Builder::new()
            .name(format!("stage-{module_id}"))
            .spawn(move || run_worker(&tx, tick, asset_root, &worker_id))
            .with_context(|| format!("spawn staging worker for {module_id}"))?;
        info!(module = module_id, tick = ?tick, "staging started");
        Ok(StageRun {
            module_id: module_id.to_string(),
            events: rx,
            worker: Some(worker),
            state: StagingState::Running,
            progress: Vec::new(),
            assets: None,
        })
    }
}

fn run_worker(tx: &Sender<StageEvent>, tick: Duration, asset_root: PathBuf, module_id: &str) {
    for step in 1..=PROGRESS_COMPLETE {
        thread::sleep(tick);
        if tx.send(StageEvent::Progress(step)).is_err() {
            debug!(module = module_id, step, "staging run abandoned");
            return;
        }
    }
    let assets = staged_asset_set(&asset_root, module_id);
    if tx.send(StageEvent::Completed(assets)).is_err() {
        debug!(module = module_id, "staging run abandoned at completion");
    }
}

/// Controller-side handle of one staging run.
#[derive(Debug)]
pub struct StageRun {
    module_id: String,
    events: Receiver<StageEvent>,
    worker: Option<JoinHandle<()>>,
    state: StagingState,
    progress: Vec<u8>,
    assets: Option<StagedAssetSet>,
}

impl StageRun {
    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub fn state(&self) -> StagingState {
        self.state
    }

    /// Latest progress received (0 before the first step).
    pub fn percent(&self) -> u8 {
        self.progress.last().copied().unwrap_or(0)
    }

    pub fn assets(&self) -> Option<&StagedAssetSet> {
        self.assets.as_ref()
    }

    /// Drain pending notifications without blocking.
    ///
    /// Errors if the worker went away before reporting completion.
    pub fn poll(&mut self) -> Result<Vec<StageEvent>> {
        let mut drained = Vec::new();
        while self.state == StagingState::Running {
            match self.events.try_recv() {
                Ok(event) => {
                    self.observe(&event);
                    drained.push(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    bail!("staging worker for {} exited early", self.module_id)
                }
            }
        }
        if self.state == StagingState::Completed {
            self.join_worker()?;
        }
        Ok(drained)
    }

    /// Block until the run completes and return its report.
    pub fn wait(&mut self) -> Result<StageReport> {
        while self.state == StagingState::Running {
            match self.events.recv() {
                Ok(event) => self.observe(&event),
                Err(RecvError) => bail!("staging worker for {} exited early", self.module_id),
            }
        }
        self.join_worker()?;
        let assets = self
            .assets
            .clone()
            .ok_or_else(|| anyhow!("staging run for {} has no assets", self.module_id))?;
        Ok(StageReport {
            module_id: self.module_id.clone(),
            progress: self.progress.clone(),
            assets,
        })
    }

    fn observe(&mut self, event: &StageEvent) {
        match event {
            StageEvent::Progress(step) => self.progress.push(*step),
            StageEvent::Completed(assets) => {
                info!(module = %self.module_id, "staging completed");
                self.assets = Some(assets.clone());
                self.state = StagingState::Completed;
            }
        }
    }

    fn join_worker(&mut self) -> Result<()> {
        if let Some(worker) = self.worker.take() {
            worker
                .join()
                .map_err(|_| anyhow!("staging worker for {} panicked", self.module_id))?;
        }
        Ok(())
    }
}

/// Operator line for a progress step, printed at quarter milestones only.
pub fn progress_line(module_id: &str, step: u8) -> Option<String> {
    if step % 25 == 0 {
        Some(format!("{module_id}: {step}%"))
    } else {
        None
    }
}

/// Operator lines for a completed run: a header and one line per asset.
pub fn completion_lines(assets: &StagedAssetSet) -> Vec<String> {
    let mut lines = vec![format!("{}: staged", assets.module_id)];
    for kind in AssetKind::ALL {
        if let Some(path) = assets.get(kind) {
            lines.push(format!("  {:<8} {}", kind.tag(), path.display()));
        }
    }
    lines
}
