//! Backup failure types.

use std::io;
use std::path::PathBuf;

use keep_core::{FailureKind, Outcome};
use thiserror::Error;

/// Terminal failure of a backup run. One variant per [`FailureKind`].
///
/// Messages name the failing step and path, and are written verbatim to the
/// audit log.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Source '{}' does not exist or is not a directory", path.display())]
    InvalidSource { path: PathBuf },

    #[error("Destination '{}' does not exist or is not a directory", path.display())]
    InvalidDestination { path: PathBuf },

    #[error("Destination '{}' is not writable: {cause}", path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },

    #[error("Failed to create archive of '{}': {cause}", path.display())]
    ArchiveCreationFailed {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },

    #[error("Failed to move archive to '{}': {cause}", path.display())]
    RelocationFailed {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },
}

impl BackupError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidSource { .. } => FailureKind::InvalidSource,
            Self::InvalidDestination { .. } => FailureKind::InvalidDestination,
            Self::DestinationUnwritable { .. } => FailureKind::DestinationUnwritable,
            Self::ArchiveCreationFailed { .. } => FailureKind::ArchiveCreationFailed,
            Self::RelocationFailed { .. } => FailureKind::RelocationFailed,
        }
    }

    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }

    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        Outcome::Failure(self.kind())
    }
}
