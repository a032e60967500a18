//! I/O helpers for launcher commands.

pub mod chooser;
pub mod config;
pub mod icon;
pub mod process;
pub mod resolve;
