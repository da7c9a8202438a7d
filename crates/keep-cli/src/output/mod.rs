use std::fmt::Write as _;

use keep_core::BackupReport;

use crate::cli::OutputFormat;

/// Render the report of a successful run in the requested format.
pub fn render(report: &BackupReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(report_text(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Raw => Ok(serde_json::to_string(report)?),
    }
}

/// Print the report of a successful run.
pub fn output_report(report: &BackupReport, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(report, format)?;
    println!("{rendered}");
    Ok(())
}

fn report_text(report: &BackupReport) -> String {
    let elapsed = report.finished_at - report.started_at;
    let mut out = format!("Backup completed: {}\n", report.archive_path.display());
    let _ = writeln!(out, "  entries  {}", report.entries);
    let _ = writeln!(out, "  bytes    {}", report.bytes);
    let _ = write!(out, "  took     {:.1}s", duration_secs(elapsed));
    out
}

#[allow(clippy::cast_precision_loss)]
fn duration_secs(elapsed: chrono::TimeDelta) -> f64 {
    elapsed.num_milliseconds().max(0) as f64 / 1000.0
}
