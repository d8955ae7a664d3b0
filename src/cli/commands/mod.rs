//! CLI command implementations
//!
//! Every command returns the process exit code: 0 on success, 2 for a
//! configuration problem, 5 for a fatal error.

pub mod export;
pub mod init;
pub mod validate;

/// Exit code for a successful run
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for an invalid or unreadable configuration
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Exit code for any other failure
pub const EXIT_FATAL: i32 = 5;
