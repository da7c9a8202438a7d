//! Append-only audit log with a stderr fallback.
//!
//! Recording an entry never fails: if the log file cannot be appended to, the
//! fully formatted line goes to the fallback stream (stderr by default)
//! together with a warning naming the log path.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use keep_core::LogEntry;

/// Where a recorded entry ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    File,
    Fallback,
}

pub struct AuditLog {
    path: PathBuf,
    fallback: Box<dyn Write + Send>,
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog").field("path", &self.path).finish_non_exhaustive()
    }
}

impl AuditLog {
    /// Audit log at `path`, falling back to stderr.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fallback(path, io::stderr())
    }

    /// Audit log at `path`, falling back to `fallback`.
    #[must_use]
    pub fn with_fallback(path: impl Into<PathBuf>, fallback: impl Write + Send + 'static) -> Self {
        Self {
            path: path.into(),
            fallback: Box::new(fallback),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&mut self, entry: &LogEntry) -> Delivery {
        let line = entry.line();
        match self.append(&line) {
            Ok(()) => Delivery::File,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "audit log unavailable");
                // Nowhere left to report a failing fallback write.
                let _ = writeln!(
                    self.fallback,
                    "warning: cannot write to log file {}: {error}",
                    self.path.display()
                );
                let _ = writeln!(self.fallback, "{line}");
                let _ = self.fallback.flush();
                Delivery::Fallback
            }
        }
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Zero-length probe before committing the real line.
        file.write_all(&[])?;

        // One write per line keeps concurrent appenders from splitting it.
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes())
    }
}
