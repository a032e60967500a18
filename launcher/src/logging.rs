//! Diagnostic tracing for the launcher.
//!
//! Events go to stderr and are filtered by `RUST_LOG`. Operator output
//! (listings, launch notices, staging progress) goes to stdout from `main`
//! and `session` and is never filtered.
//!
//! Useful targets:
//! - `launcher::io::process`: spawn attempts, pids, working directories.
//! - `launcher::stage`: run start, abandonment and completion.
//! - `launcher::io::icon`: icon fetch failures (debug only).
//! - `launcher::configure`: path edits and cancelled selections.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber. Without `RUST_LOG` only warnings show.
///
/// ```bash
/// RUST_LOG=warn,launcher::stage=debug launcher stage heart liver
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
