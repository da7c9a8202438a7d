//! The backup driver: validate, archive, relocate, with an audit entry at
//! every milestone.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use keep_core::{
    ArchiveDescriptor, BackupReport, BackupRequest, CollisionPolicy, LogEntry, LogLevel, Stage,
};

use crate::archive::{CreateArchive, TarGzArchiver, remove_partial};
use crate::audit::AuditLog;
use crate::clock::{Clock, SystemClock};
use crate::error::BackupError;
use crate::relocate::{AtomicMover, MoveFile, resolve_collision};
use crate::validate::{self, ValidatedPaths};

/// Prefix of the per-run staging directory.
const STAGING_PREFIX: &str = "keepsake-";

/// Times a suffixed name is re-resolved after losing it to another writer.
const MAX_CLAIM_ATTEMPTS: u32 = 8;

/// Knobs the driver needs beyond its collaborators.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Parent of the per-run staging directory.
    pub staging_dir: PathBuf,
    pub collision: CollisionPolicy,
    /// Probe destination writability again right before the move.
    pub recheck_destination: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            staging_dir: std::env::temp_dir(),
            collision: CollisionPolicy::default(),
            recheck_destination: true,
        }
    }
}

/// Notified each time the driver enters a new stage.
pub trait StageObserver {
    fn on_stage(&mut self, stage: Stage);
}

impl<F: FnMut(Stage)> StageObserver for F {
    fn on_stage(&mut self, stage: Stage) {
        self(stage);
    }
}

/// One backup attempt, start to finish.
///
/// Stages run strictly in order with no retry; the first failure ends the run.
pub struct Pipeline {
    options: PipelineOptions,
    audit: AuditLog,
    archiver: Box<dyn CreateArchive>,
    mover: Box<dyn MoveFile>,
    clock: Box<dyn Clock>,
    observer: Option<Box<dyn StageObserver>>,
    stage: Stage,
}

impl Pipeline {
    /// Driver with the default collaborators: [`TarGzArchiver`],
    /// [`AtomicMover`], and [`SystemClock`].
    #[must_use]
    pub fn new(options: PipelineOptions, audit: AuditLog) -> Self {
        Self {
            options,
            audit,
            archiver: Box::new(TarGzArchiver::default()),
            mover: Box::new(AtomicMover),
            clock: Box::new(SystemClock),
            observer: None,
            stage: Stage::Init,
        }
    }

    #[must_use]
    pub fn with_archiver(mut self, archiver: impl CreateArchive + 'static) -> Self {
        self.archiver = Box::new(archiver);
        self
    }

    #[must_use]
    pub fn with_mover(mut self, mover: impl MoveFile + 'static) -> Self {
        self.mover = Box::new(mover);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl StageObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub const fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Run the pipeline for `request`.
    ///
    /// Logs `INFO` on start and `SUCCESS` or `ERROR` on completion. The error
    /// carries the [`keep_core::FailureKind`] that decides the exit code.
    pub fn run(&mut self, request: &BackupRequest) -> Result<BackupReport, BackupError> {
        self.stage = Stage::Init;
        self.notify();

        let started_at = self.clock.now();
        self.log(
            LogLevel::Info,
            &format!(
                "Starting backup of '{}' to '{}'",
                request.source_path, request.destination_path
            ),
        );

        let result = self.execute(request, &started_at);
        match &result {
            Ok(report) => self.log(
                LogLevel::Success,
                &format!(
                    "Backup completed: {} ({} bytes)",
                    report.archive_path.display(),
                    report.bytes
                ),
            ),
            Err(error) => self.log(LogLevel::Error, &error.to_string()),
        }

        self.enter(Stage::Done);
        result
    }

    fn execute(
        &mut self,
        request: &BackupRequest,
        started_at: &DateTime<Local>,
    ) -> Result<BackupReport, BackupError> {
        self.enter(Stage::Validating);
        let paths = validate::validate(request)?;

        self.enter(Stage::Archiving);
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.options.staging_dir)
            .map_err(|cause| BackupError::ArchiveCreationFailed {
                path: self.options.staging_dir.clone(),
                cause,
            })?;

        let descriptor = ArchiveDescriptor::new(
            &paths.source,
            &paths.destination,
            staging.path(),
            &self.clock.now(),
        );
        tracing::debug!(
            archive = %descriptor.archive_name,
            staging = %descriptor.staging_path.display(),
            "writing archive"
        );

        let stats = self
            .archiver
            .create_archive(&paths.source, &descriptor.staging_path)
            .map_err(|cause| {
                remove_partial(&descriptor.staging_path);
                BackupError::ArchiveCreationFailed {
                    path: paths.source.clone(),
                    cause,
                }
            })?;

        self.enter(Stage::Relocating);
        let relocated = self.relocate(&paths, &descriptor);
        if relocated.is_err() {
            remove_partial(&descriptor.staging_path);
        }
        close_staging(staging);
        let descriptor = relocated?;

        Ok(BackupReport {
            archive_name: descriptor.archive_name,
            archive_path: descriptor.final_path,
            bytes: stats.bytes,
            entries: stats.entries,
            started_at: *started_at,
            finished_at: self.clock.now(),
        })
    }

    fn relocate(
        &self,
        paths: &ValidatedPaths,
        descriptor: &ArchiveDescriptor,
    ) -> Result<ArchiveDescriptor, BackupError> {
        let failed = |path: &Path, cause| BackupError::RelocationFailed {
            path: path.to_path_buf(),
            cause,
        };

        if self.options.recheck_destination {
            validate::probe_writable(&paths.destination)
                .map_err(|cause| failed(&paths.destination, cause))?;
        }

        let policy = self.options.collision;
        let mut attempts = 0;
        loop {
            let target = resolve_collision(descriptor, policy)
                .map_err(|cause| failed(&descriptor.final_path, cause))?;

            let moved = if policy == CollisionPolicy::Overwrite {
                self.mover.move_file(&target.staging_path, &target.final_path)
            } else {
                self.mover
                    .move_file_new(&target.staging_path, &target.final_path)
            };

            match moved {
                Ok(()) => {
                    tracing::debug!(path = %target.final_path.display(), "archive relocated");
                    return Ok(target);
                }
                // Another writer took the name between resolving and moving.
                Err(cause)
                    if cause.kind() == io::ErrorKind::AlreadyExists
                        && policy == CollisionPolicy::Suffix
                        && attempts < MAX_CLAIM_ATTEMPTS =>
                {
                    attempts += 1;
                    tracing::debug!(path = %target.final_path.display(), "name taken; resolving again");
                }
                Err(cause) => return Err(failed(&target.final_path, cause)),
            }
        }
    }

    fn enter(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_transition_to(next),
            "illegal stage transition {} -> {next}",
            self.stage
        );
        self.stage = next;
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_stage(self.stage);
        }
    }

    fn log(&mut self, level: LogLevel, message: &str) {
        let entry = LogEntry::new(&self.clock.now(), level, message);
        self.audit.record(&entry);
    }
}

fn close_staging(staging: tempfile::TempDir) {
    let path = staging.path().to_path_buf();
    if let Err(error) = staging.close() {
        tracing::warn!(path = %path.display(), %error, "failed to remove staging directory");
    }
}
