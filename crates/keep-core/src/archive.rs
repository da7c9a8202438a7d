//! Archive naming.
//!
//! An archive is named `<basename>_<YYYY-MM-DD_HH:MM:SS>.tar.gz` and lives in
//! two places over its lifetime: the staging directory while it is written,
//! then the destination directory once relocated.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::time::archive_timestamp;

/// File extension of every archive Keepsake produces.
pub const ARCHIVE_EXTENSION: &str = "tar.gz";

/// Basename used when the source path has no final component (e.g. `/`).
const ROOT_BASENAME: &str = "root";

/// Where an archive is staged and where it ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDescriptor {
    pub archive_name: String,
    pub staging_path: PathBuf,
    pub final_path: PathBuf,
}

impl ArchiveDescriptor {
    #[must_use]
    pub fn new(
        source_dir: &Path,
        destination_dir: &Path,
        staging_dir: &Path,
        at: &DateTime<Local>,
    ) -> Self {
        let archive_name = format!(
            "{}_{}.{ARCHIVE_EXTENSION}",
            source_basename(source_dir),
            archive_timestamp(at)
        );
        Self {
            staging_path: staging_dir.join(&archive_name),
            final_path: destination_dir.join(&archive_name),
            archive_name,
        }
    }

    /// Same archive, renamed to `<stem>_<n>.tar.gz` at the destination.
    ///
    /// The staging path is left alone: only the final name changes.
    #[must_use]
    pub fn with_suffix(&self, n: u32) -> Self {
        let archive_name = format!("{}_{n}.{ARCHIVE_EXTENSION}", self.stem());
        let final_path = self
            .final_path
            .parent()
            .map_or_else(|| PathBuf::from(&archive_name), |dir| dir.join(&archive_name));
        Self {
            archive_name,
            staging_path: self.staging_path.clone(),
            final_path,
        }
    }

    /// Archive name without the `.tar.gz` extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        self.archive_name
            .strip_suffix(ARCHIVE_EXTENSION)
            .and_then(|rest| rest.strip_suffix('.'))
            .unwrap_or(&self.archive_name)
    }
}

/// Final path component of `source_dir`, which also becomes the single
/// top-level directory inside the archive.
#[must_use]
pub fn source_basename(source_dir: &Path) -> String {
    source_dir
        .file_name()
        .map_or_else(|| ROOT_BASENAME.to_string(), |name| name.to_string_lossy().into_owned())
}
