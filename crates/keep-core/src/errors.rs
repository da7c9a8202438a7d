//! Cross-cutting error types for Keepsake.
//!
//! Pipeline failures live in `keep-backup` as `BackupError`; this module only
//! covers errors raised by the shared types themselves.

use thiserror::Error;

/// Errors that can be raised by any Keepsake crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A textual value did not name any known variant.
    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}
