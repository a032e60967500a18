//! Stable exit codes for launcher CLI commands.

/// Command succeeded (module launched, staging completed, list printed).
pub const OK: i32 = 0;
/// Command failed due to an invalid config, unknown module id or other errors.
pub const INVALID: i32 = 1;
/// `launcher launch` found no executable at the configured path.
pub const NOT_FOUND: i32 = 2;
/// `launcher launch` was refused by the OS when spawning the executable.
pub const SPAWN_FAILED: i32 = 3;
