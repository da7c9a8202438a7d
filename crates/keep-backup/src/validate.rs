//! Path validation: both paths must be existing directories and the
//! destination must accept a new file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use keep_core::BackupRequest;

use crate::error::BackupError;

/// Prefix of the transient marker created to probe destination writability.
const PROBE_PREFIX: &str = ".keepsake-probe-";

/// Request paths after validation, resolved to absolute form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPaths {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Check the filesystem properties of both request paths, in order.
///
/// The only side effect is the marker file created and removed by
/// [`probe_writable`].
pub fn validate(request: &BackupRequest) -> Result<ValidatedPaths, BackupError> {
    let source = expand_user(&request.source_path);
    let source = resolve_dir(&source).ok_or(BackupError::InvalidSource { path: source })?;

    let destination = expand_user(&request.destination_path);
    let destination = resolve_dir(&destination)
        .ok_or(BackupError::InvalidDestination { path: destination })?;

    probe_writable(&destination).map_err(|cause| BackupError::DestinationUnwritable {
        path: destination.clone(),
        cause,
    })?;

    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        "paths validated"
    );

    Ok(ValidatedPaths {
        source,
        destination,
    })
}

/// Create and remove a marker file inside `dir`.
///
/// Effective writability depends on ownership, ACLs, and mount options, so
/// this attempts a real write instead of reading permission bits. Removal of
/// the marker is best-effort on every path.
pub fn probe_writable(dir: &Path) -> io::Result<()> {
    let marker = tempfile::Builder::new()
        .prefix(PROBE_PREFIX)
        .tempfile_in(dir)?;

    if let Err(error) = marker.close() {
        tracing::warn!(dir = %dir.display(), %error, "failed to remove write probe marker");
    }
    Ok(())
}

/// Trim surrounding whitespace and expand a leading `~` to the home directory.
#[must_use]
pub fn expand_user(raw: &str) -> PathBuf {
    let trimmed = raw.trim();

    let home_relative = if trimmed == "~" {
        Some("")
    } else {
        trimmed.strip_prefix("~/")
    };

    match (home_relative, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(trimmed),
    }
}

fn resolve_dir(path: &Path) -> Option<PathBuf> {
    if path.as_os_str().is_empty() || !path.is_dir() {
        return None;
    }
    fs::canonicalize(path).ok()
}
