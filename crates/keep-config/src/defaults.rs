//! Built-in configuration defaults.

use std::path::PathBuf;

/// Log location used when the deployment does not pick one.
pub const DEFAULT_LOG_FILE: &str = "/var/log/custom_backup.log";

/// gzip level used when the deployment does not pick one.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

pub fn log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

pub fn staging_dir() -> PathBuf {
    std::env::temp_dir()
}

pub const fn compression_level() -> u32 {
    DEFAULT_COMPRESSION_LEVEL
}

pub const fn recheck_destination() -> bool {
    true
}
