//! Shared deterministic types for launcher core logic.

use serde::Serialize;

/// Whether a module's configured executable is present on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    Ready,
    Missing,
}

impl Readiness {
    pub fn is_ready(self) -> bool {
        self == Readiness::Ready
    }

    /// Operator-facing status label.
    pub fn label(self) -> &'static str {
        match self {
            Readiness::Ready => "Ready",
            Readiness::Missing => "Not Found",
        }
    }
}

/// Lifecycle of asset staging for one module.
///
/// `Idle` means no run has been started for the module in this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingState {
    Idle,
    Running,
    Completed,
}

/// Progress percentage reached when a staging run completes.
pub const PROGRESS_COMPLETE: u8 = 100;
