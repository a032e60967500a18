//! Launcher for a suite of VR medical-training simulations.
//!
//! The suite is a fixed catalog of anatomical modules. Each module either
//! launches a locally installed executable or stages (simulated) assets in
//! the background. The crate keeps a strict split:
//!
//! - **[`core`]**: Pure, deterministic logic (readiness, staging states, asset
//!   naming). No I/O.
//! - **[`io`]**: Side-effecting operations (filesystem checks, process spawn,
//!   config files, file selection, icon fetches).
//!
//! Orchestration modules ([`launch`], [`stage`], [`configure`], [`session`])
//! combine the two to implement the CLI commands.

pub mod catalog;
pub mod configure;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod launch;
pub mod logging;
pub mod session;
pub mod stage;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
