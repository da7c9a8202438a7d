//! Levels, failure kinds, pipeline stages, and policies for Keepsake.
//!
//! Enums that travel through config or JSON output use `snake_case`
//! serialization. `Stage` carries its own transition table so the driver can
//! assert it only ever moves forward.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// LogLevel
// ---------------------------------------------------------------------------

/// Severity of an audit log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

impl LogLevel {
    /// Return the label written between brackets in the log line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// Terminal failure of a backup attempt. Each kind owns a distinct exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidSource,
    InvalidDestination,
    DestinationUnwritable,
    ArchiveCreationFailed,
    RelocationFailed,
}

impl FailureKind {
    /// Process exit code reported for this failure.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::InvalidSource => 1,
            Self::InvalidDestination => 2,
            Self::DestinationUnwritable => 3,
            Self::ArchiveCreationFailed => 4,
            Self::RelocationFailed => 5,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidSource => "invalid_source",
            Self::InvalidDestination => "invalid_destination",
            Self::DestinationUnwritable => "destination_unwritable",
            Self::ArchiveCreationFailed => "archive_creation_failed",
            Self::RelocationFailed => "relocation_failed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Position of the pipeline driver in its forward-only state machine.
///
/// ```text
/// init → validating → archiving → relocating → done
///             ↘            ↘
///              done         done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    Validating,
    Archiving,
    Relocating,
    Done,
}

impl Stage {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Init => &[Self::Validating],
            Self::Validating => &[Self::Archiving, Self::Done],
            Self::Archiving => &[Self::Relocating, Self::Done],
            Self::Relocating => &[Self::Done],
            Self::Done => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Validating => "validating",
            Self::Archiving => "archiving",
            Self::Relocating => "relocating",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CollisionPolicy
// ---------------------------------------------------------------------------

/// What to do when the destination already holds an archive with the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Pick the first free `<name>_<n>.tar.gz`.
    #[default]
    Suffix,
    /// Fail the relocation and leave the existing archive untouched.
    Reject,
    /// Replace the existing archive.
    Overwrite,
}

impl CollisionPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Suffix => "suffix",
            Self::Reject => "reject",
            Self::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollisionPolicy {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "suffix" => Ok(Self::Suffix),
            "reject" => Ok(Self::Reject),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(CoreError::UnknownVariant {
                kind: "collision policy",
                value: other.to_string(),
                expected: "suffix, reject, overwrite",
            }),
        }
    }
}
