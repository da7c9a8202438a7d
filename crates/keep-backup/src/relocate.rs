//! Relocation of the staged archive into the destination directory.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use keep_core::{ArchiveDescriptor, CollisionPolicy};

/// Upper bound on `_<n>` suffixes tried before giving up on a free name.
const MAX_SUFFIX: u32 = 10_000;

/// Prefix of the in-destination temp file used for cross-filesystem moves.
const PARTIAL_PREFIX: &str = ".keepsake-partial-";

/// Capability to move a finished file to its final location.
///
/// Implementations must never leave a partially written file at `to`.
pub trait MoveFile {
    /// Move `from` to `to`, replacing whatever is at `to`.
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Move `from` to `to`, failing with `AlreadyExists` if `to` is taken.
    ///
    /// The default delegates to [`MoveFile::move_file`] and therefore replaces
    /// a file that appears at `to` after the caller checked for it.
    fn move_file_new(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.move_file(from, to)
    }
}

/// How the final name is claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Replace,
    NoClobber,
}

/// Rename (or hard-link, when the target must not be replaced) when possible;
/// otherwise copy into a temp file next to `to` and rename that into place.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicMover;

impl MoveFile for AtomicMover {
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        move_with(from, to, Placement::Replace, |from, to| fs::rename(from, to))
    }

    fn move_file_new(&self, from: &Path, to: &Path) -> io::Result<()> {
        move_with(from, to, Placement::NoClobber, |from, to| fs::hard_link(from, to))
    }
}

/// Claim `to` with `place`, falling back to a copy when `place` cannot work
/// across the two locations. The source is gone on success.
fn move_with(
    from: &Path,
    to: &Path,
    placement: Placement,
    place: impl FnOnce(&Path, &Path) -> io::Result<()>,
) -> io::Result<()> {
    if let Err(error) = place(from, to) {
        let copy = match placement {
            Placement::Replace => error.kind() == io::ErrorKind::CrossesDevices,
            // Hard links also fail on filesystems without link support.
            Placement::NoClobber => error.kind() != io::ErrorKind::AlreadyExists,
        };
        if !copy {
            return Err(error);
        }
        tracing::debug!(
            from = %from.display(),
            to = %to.display(),
            %error,
            "copying through a destination temp file"
        );
        copy_then_persist(from, to, placement)?;
    }

    match fs::remove_file(from) {
        Err(error) if error.kind() != io::ErrorKind::NotFound => {
            tracing::warn!(path = %from.display(), %error, "failed to remove moved source");
        }
        _ => {}
    }
    Ok(())
}

/// Copy `from` into a temp file in `to`'s directory, flush it, then rename it
/// onto `to`. The temp file is removed if any step fails.
fn copy_then_persist(from: &Path, to: &Path, placement: Placement) -> io::Result<()> {
    let dir = to.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' has no parent directory", to.display()),
        )
    })?;

    let mut partial = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .tempfile_in(dir)?;
    let mut reader = File::open(from)?;
    io::copy(&mut reader, partial.as_file_mut())?;
    partial.as_file().sync_all()?;
    match placement {
        Placement::Replace => partial.persist(to),
        Placement::NoClobber => partial.persist_noclobber(to),
    }
    .map_err(|error| error.error)?;
    Ok(())
}

/// Pick the final archive location according to `policy`.
///
/// `Reject` fails with `AlreadyExists` when the name is taken; `Suffix` walks
/// `_1`, `_2`, ... until a free name is found; `Overwrite` keeps the name.
///
/// The answer can go stale before the move. Callers that must not replace a
/// file move with [`MoveFile::move_file_new`] and resolve again on
/// `AlreadyExists`.
pub fn resolve_collision(
    descriptor: &ArchiveDescriptor,
    policy: CollisionPolicy,
) -> io::Result<ArchiveDescriptor> {
    if !exists(&descriptor.final_path)? {
        return Ok(descriptor.clone());
    }

    match policy {
        CollisionPolicy::Overwrite => {
            tracing::debug!(path = %descriptor.final_path.display(), "overwriting existing archive");
            Ok(descriptor.clone())
        }
        CollisionPolicy::Reject => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("'{}' already exists", descriptor.final_path.display()),
        )),
        CollisionPolicy::Suffix => {
            for n in 1..=MAX_SUFFIX {
                let candidate = descriptor.with_suffix(n);
                if !exists(&candidate.final_path)? {
                    return Ok(candidate);
                }
            }
            Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!(
                    "no free name for '{}' after {MAX_SUFFIX} attempts",
                    descriptor.archive_name
                ),
            ))
        }
    }
}

fn exists(path: &Path) -> io::Result<bool> {
    fs::symlink_metadata(path).map_or_else(
        |error| {
            if error.kind() == io::ErrorKind::NotFound {
                Ok(false)
            } else {
                Err(error)
            }
        },
        |_| Ok(true),
    )
}
