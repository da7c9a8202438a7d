use std::path::PathBuf;

use clap::Parser;
use keep_core::CollisionPolicy;

pub mod global;

pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `keep` binary.
#[derive(Debug, Parser)]
#[command(
    name = "keep",
    version,
    about = "Keepsake - archive a directory into a timestamped tarball",
    after_help = "Exit codes: 0 success, 1 invalid source, 2 invalid destination, \
                  3 destination not writable, 4 archive creation failed, 5 relocation failed"
)]
pub struct Cli {
    /// Directory to back up (prompted for when omitted)
    pub source: Option<String>,

    /// Directory that receives the archive (prompted for when omitted)
    pub destination: Option<String>,

    /// Fail instead of prompting when a directory is missing
    #[arg(long)]
    pub no_prompt: bool,

    /// Audit log file [env: KEEPSAKE_LOG_FILE]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Parent directory for the per-run staging area [env: KEEPSAKE_STAGING_DIR]
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Name clash handling at the destination: suffix, reject, overwrite
    #[arg(long, value_name = "POLICY", value_parser = parse_collision)]
    pub collision: Option<CollisionPolicy>,

    /// Report format: text, json, raw
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (no progress, no text report)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

fn parse_collision(value: &str) -> Result<CollisionPolicy, String> {
    value.parse().map_err(|error: keep_core::CoreError| error.to_string())
}
