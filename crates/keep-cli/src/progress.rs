use std::io::{self, Write};
use std::sync::OnceLock;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use keep_core::Stage;

use crate::ui;

/// Stage spinner for a single backup run.
///
/// There is no steady tick: the spinner advances when the driver reports a
/// new stage, so nothing runs in the background.
pub struct Progress {
    bar: Option<ProgressBar>,
}

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(MultiProgress::new)
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = multi_progress().add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.tick();
        Self { bar: Some(bar) }
    }

    /// Callback for [`keep_backup::Pipeline::with_observer`].
    #[must_use]
    pub fn observer(&self) -> impl FnMut(Stage) + 'static {
        let bar = self.bar.clone();
        move |stage: Stage| {
            if let Some(bar) = &bar {
                bar.set_message(stage_message(stage));
                bar.tick();
            }
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

const fn stage_message(stage: Stage) -> &'static str {
    match stage {
        Stage::Init => "starting backup",
        Stage::Validating => "checking directories",
        Stage::Archiving => "creating archive",
        Stage::Relocating => "moving archive into place",
        Stage::Done => "finishing",
    }
}

/// Writer that hides any live spinner while it emits complete lines.
///
/// Bytes are held until a newline (or flush/drop) so a line is never split
/// around a spinner redraw.
pub struct SuspendingWriter<W: Write> {
    inner: W,
    pending: Vec<u8>,
}

impl<W: Write> SuspendingWriter<W> {
    pub const fn new(inner: W) -> Self {
        Self {
            inner,
            pending: Vec::new(),
        }
    }

    fn emit(&mut self, len: usize) -> io::Result<()> {
        if len == 0 {
            return Ok(());
        }
        let chunk = self.pending.drain(..len).collect::<Vec<_>>();
        let inner = &mut self.inner;
        multi_progress().suspend(|| inner.write_all(&chunk).and_then(|()| inner.flush()))
    }
}

/// Stderr through [`SuspendingWriter`], for the audit fallback and tracing.
#[must_use]
pub fn stderr() -> SuspendingWriter<io::Stderr> {
    SuspendingWriter::new(io::stderr())
}

impl<W: Write> Write for SuspendingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        if let Some(end) = self.pending.iter().rposition(|byte| *byte == b'\n') {
            self.emit(end + 1)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit(self.pending.len())?;
        self.inner.flush()
    }
}

impl<W: Write> Drop for SuspendingWriter<W> {
    fn drop(&mut self) {
        let _ = self.emit(self.pending.len());
    }
}
