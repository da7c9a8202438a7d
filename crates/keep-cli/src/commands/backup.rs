use std::process::ExitCode;

use keep_backup::{AuditLog, Pipeline, PipelineOptions, TarGzArchiver};
use keep_config::KeepConfig;
use keep_core::BackupRequest;

use crate::cli::GlobalFlags;
use crate::output;
use crate::progress::{self, Progress};
use crate::ui;

/// Handle a backup run. The exit code is the pipeline outcome.
pub fn handle(request: &BackupRequest, config: &KeepConfig, flags: &GlobalFlags) -> ExitCode {
    let options = PipelineOptions {
        staging_dir: config.staging_dir.clone(),
        collision: config.collision,
        recheck_destination: config.recheck_destination,
    };
    let archiver = TarGzArchiver::new(config.compression_level, config.follow_symlinks);

    let progress = Progress::spinner("starting backup");
    let audit = AuditLog::with_fallback(&config.log_file, progress::stderr());
    let mut pipeline = Pipeline::new(options, audit)
        .with_archiver(archiver)
        .with_observer(progress.observer());

    let result = pipeline.run(request);
    progress.finish_clear();

    match result {
        Ok(report) => {
            if ui::prefs().report
                && let Err(error) = output::output_report(&report, flags.format)
            {
                tracing::warn!(%error, "failed to print backup report");
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("keep error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}
