//! # keep-backup
//!
//! The Keepsake backup pipeline.
//!
//! A run is a straight line of blocking filesystem steps:
//! 1. [`validate`]: both paths are existing directories and the destination
//!    accepts a new file
//! 2. [`archive`]: a `.tar.gz` of the source is written into a fresh staging
//!    directory
//! 3. [`relocate`]: the archive is moved into the destination without ever
//!    exposing a partial file under its final name
//!
//! [`Pipeline`] sequences the steps and records `INFO`/`SUCCESS`/`ERROR`
//! entries through [`AuditLog`]. Archiving, moving, time, and path
//! acquisition sit behind small traits so tests can swap them out.

pub mod archive;
pub mod audit;
pub mod clock;
pub mod error;
pub mod pipeline;
pub mod relocate;
pub mod request;
pub mod validate;

pub use archive::{ArchiveStats, CreateArchive, TarGzArchiver};
pub use audit::{AuditLog, Delivery};
pub use clock::{Clock, SystemClock};
pub use error::BackupError;
pub use pipeline::{Pipeline, PipelineOptions, StageObserver};
pub use relocate::{AtomicMover, MoveFile};
pub use request::{ArgsSource, PromptSource, RequestSource};
pub use validate::ValidatedPaths;
