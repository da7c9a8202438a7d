//! Acquisition of the two request paths.
//!
//! The driver only needs "two path strings"; where they come from (command
//! arguments, an interactive prompt) is pluggable behind [`RequestSource`].

use std::io::{self, BufRead, Write};

use keep_core::BackupRequest;

pub const SOURCE_PROMPT: &str = "Source directory: ";
pub const DESTINATION_PROMPT: &str = "Destination directory: ";

/// Anything that can provide a [`BackupRequest`] before the pipeline starts.
pub trait RequestSource {
    fn request(&mut self) -> io::Result<BackupRequest>;
}

/// Paths supplied up front; a missing value is an error.
#[derive(Debug, Clone, Default)]
pub struct ArgsSource {
    source: Option<String>,
    destination: Option<String>,
}

impl ArgsSource {
    #[must_use]
    pub const fn new(source: Option<String>, destination: Option<String>) -> Self {
        Self {
            source,
            destination,
        }
    }
}

impl RequestSource for ArgsSource {
    fn request(&mut self) -> io::Result<BackupRequest> {
        let source = self.source.clone().ok_or_else(|| missing("source"))?;
        let destination = self.destination.clone().ok_or_else(|| missing("destination"))?;
        Ok(BackupRequest::new(source, destination))
    }
}

/// Reads missing paths line by line from `input`, writing prompts to `output`.
///
/// Values supplied with [`PromptSource::with_source`] or
/// [`PromptSource::with_destination`] are used as-is and not prompted for.
#[derive(Debug)]
pub struct PromptSource<R, W> {
    input: R,
    output: W,
    source: Option<String>,
    destination: Option<String>,
}

impl<R: BufRead, W: Write> PromptSource<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            source: None,
            destination: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_destination(mut self, destination: Option<String>) -> Self {
        self.destination = destination;
        self
    }

    fn ask(&mut self, prompt: &str, what: &str) -> io::Result<String> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input closed before a {what} directory was entered"),
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> RequestSource for PromptSource<R, W> {
    fn request(&mut self) -> io::Result<BackupRequest> {
        let source = match self.source.clone() {
            Some(source) => source,
            None => self.ask(SOURCE_PROMPT, "source")?,
        };
        let destination = match self.destination.clone() {
            Some(destination) => destination,
            None => self.ask(DESTINATION_PROMPT, "destination")?,
        };
        Ok(BackupRequest::new(source, destination))
    }
}

fn missing(what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("missing {what} directory argument"),
    )
}
