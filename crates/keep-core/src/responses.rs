//! Response types rendered by the `keep` binary.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Summary of a successful backup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackupReport {
    pub archive_name: String,
    pub archive_path: PathBuf,
    /// Size of the compressed archive in bytes.
    pub bytes: u64,
    /// Number of tar entries written (directories, files, links).
    pub entries: u64,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}
