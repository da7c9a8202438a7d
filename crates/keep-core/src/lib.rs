//! # keep-core
//!
//! Core types and error types for Keepsake.
//!
//! This crate provides the foundational types shared across all Keepsake crates:
//! - The backup request and the archive descriptor derived from it
//! - Log levels, failure kinds, pipeline stages, and collision policies
//! - Audit log entry formatting
//! - Outcome to exit code mapping
//! - The success report rendered by the CLI
//! - Cross-cutting error types

pub mod archive;
pub mod entry;
pub mod enums;
pub mod errors;
pub mod outcome;
pub mod request;
pub mod responses;
pub mod time;

pub use archive::{ARCHIVE_EXTENSION, ArchiveDescriptor};
pub use entry::LogEntry;
pub use enums::{CollisionPolicy, FailureKind, LogLevel, Stage};
pub use errors::CoreError;
pub use outcome::Outcome;
pub use request::BackupRequest;
pub use responses::BackupReport;
