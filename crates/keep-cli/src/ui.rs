use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub progress: bool,
    pub report: bool,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(prefs_for(flags, std::io::stderr().is_terminal()));
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        progress: false,
        report: true,
    })
}

/// The spinner draws on stderr, so it depends on stderr being a terminal.
fn prefs_for(flags: &GlobalFlags, stderr_is_tty: bool) -> UiPrefs {
    let progress = stderr_is_tty && !flags.quiet && flags.format != OutputFormat::Json;
    let report = !(flags.quiet && flags.format == OutputFormat::Text);
    UiPrefs { progress, report }
}
