//! Archive creation: a gzip-compressed tar rooted at the source basename.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use keep_core::archive::source_basename;
use tar::Builder;
use walkdir::WalkDir;

/// Counters reported after a successful archive write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub entries: u64,
    pub bytes: u64,
}

/// Capability to turn a directory into a single archive file.
///
/// Implementations must leave nothing at `archive_path` when they fail.
pub trait CreateArchive {
    fn create_archive(&self, source_dir: &Path, archive_path: &Path) -> io::Result<ArchiveStats>;
}

/// Writes `.tar.gz` archives in-process with `tar` and `flate2`.
#[derive(Debug, Clone, Copy)]
pub struct TarGzArchiver {
    compression: Compression,
    follow_symlinks: bool,
}

impl Default for TarGzArchiver {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            follow_symlinks: false,
        }
    }
}

impl TarGzArchiver {
    #[must_use]
    pub fn new(level: u32, follow_symlinks: bool) -> Self {
        Self {
            compression: Compression::new(level),
            follow_symlinks,
        }
    }

    fn write_archive(
        &self,
        file: File,
        source_dir: &Path,
        excluded: &Path,
    ) -> io::Result<ArchiveStats> {
        let encoder = GzEncoder::new(BufWriter::new(file), self.compression);
        let mut builder = Builder::new(encoder);
        builder.follow_symlinks(self.follow_symlinks);

        let root = PathBuf::from(source_basename(source_dir));
        let mut entries = 0_u64;

        let walker = WalkDir::new(source_dir)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let skip = entry.path() == excluded;
                if skip {
                    tracing::debug!(path = %excluded.display(), "skipping staging directory");
                }
                !skip
            });
        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            if is_socket(&entry) {
                tracing::warn!(path = %entry.path().display(), "socket ignored");
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(source_dir)
                .map_err(io::Error::other)?;
            let name = if relative.as_os_str().is_empty() {
                root.clone()
            } else {
                root.join(relative)
            };

            builder.append_path_with_name(entry.path(), &name)?;
            entries += 1;
        }

        let encoder = builder.into_inner()?;
        let writer = encoder.finish()?;
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.sync_all()?;
        let bytes = file.metadata()?.len();

        Ok(ArchiveStats { entries, bytes })
    }
}

impl CreateArchive for TarGzArchiver {
    /// The directory holding `archive_path` is left out of the walk, so a
    /// staging area inside `source_dir` never ends up in its own archive.
    fn create_archive(&self, source_dir: &Path, archive_path: &Path) -> io::Result<ArchiveStats> {
        // create_new: never clobber, and never clean up a file this call did not create.
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(archive_path)?;

        let result = staging_dir_of(archive_path).and_then(|excluded| {
            let source_dir = fs::canonicalize(source_dir)?;
            self.write_archive(file, &source_dir, &excluded)
        });
        if result.is_err() {
            remove_partial(archive_path);
        }
        result
    }
}

fn staging_dir_of(archive_path: &Path) -> io::Result<PathBuf> {
    let parent = archive_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::canonicalize(parent)
}

#[cfg(unix)]
fn is_socket(entry: &walkdir::DirEntry) -> bool {
    use std::os::unix::fs::FileTypeExt;
    entry.file_type().is_socket()
}

#[cfg(not(unix))]
const fn is_socket(_entry: &walkdir::DirEntry) -> bool {
    false
}

/// Best-effort removal of a staged file. Failures are traced, never returned.
pub(crate) fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial archive"),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "failed to remove partial archive");
        }
    }
}

/// Open an archive produced by [`TarGzArchiver`] for reading.
pub fn open_archive(path: &Path) -> io::Result<tar::Archive<flate2::read::GzDecoder<File>>> {
    let file = File::open(path)?;
    Ok(tar::Archive::new(flate2::read::GzDecoder::new(file)))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn sample_tree(root: &Path) -> PathBuf {
        let source = root.join("projects");
        fs::create_dir_all(source.join("src/nested")).expect("dirs should create");
        fs::create_dir_all(source.join("empty")).expect("dirs should create");
        fs::write(source.join("README.md"), "# hello\n").expect("file should write");
        fs::write(source.join("src/main.rs"), "fn main() {}\n").expect("file should write");
        fs::write(source.join("src/nested/data.bin"), [0_u8, 1, 2, 255]).expect("file should write");
        source
    }

    fn entry_names(archive_path: &Path) -> BTreeSet<String> {
        let mut archive = open_archive(archive_path).expect("archive should open");
        archive
            .entries()
            .expect("entries should read")
            .map(|entry| {
                let entry = entry.expect("entry should read");
                entry
                    .path()
                    .expect("entry path")
                    .to_string_lossy()
                    .trim_end_matches('/')
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn archive_is_rooted_at_source_basename() {
        let temp = TempDir::new().expect("tempdir should create");
        let source = sample_tree(temp.path());
        let archive_path = temp.path().join("out.tar.gz");

        let stats = TarGzArchiver::default()
            .create_archive(&source, &archive_path)
            .expect("archive should write");

        let names = entry_names(&archive_path);
        let expected: BTreeSet<String> = [
            "projects",
            "projects/README.md",
            "projects/empty",
            "projects/src",
            "projects/src/main.rs",
            "projects/src/nested",
            "projects/src/nested/data.bin",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        assert_eq!(names, expected);
        assert_eq!(stats.entries, 7);
        assert_eq!(stats.bytes, fs::metadata(&archive_path).expect("metadata").len());
        assert!(names.iter().all(|name| !name.starts_with('/')));
    }

    #[test]
    fn extracted_files_match_source_bytes() {
        let temp = TempDir::new().expect("tempdir should create");
        let source = sample_tree(temp.path());
        let archive_path = temp.path().join("out.tar.gz");
        let unpack = temp.path().join("unpack");

        TarGzArchiver::new(9, false)
            .create_archive(&source, &archive_path)
            .expect("archive should write");
        open_archive(&archive_path)
            .expect("archive should open")
            .unpack(&unpack)
            .expect("archive should unpack");

        let restored = unpack.join("projects");
        for relative in ["README.md", "src/main.rs", "src/nested/data.bin"] {
            assert_eq!(
                fs::read(restored.join(relative)).expect("restored file"),
                fs::read(source.join(relative)).expect("source file"),
                "{relative} differs"
            );
        }
        assert!(restored.join("empty").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_stored_as_links() {
        let temp = TempDir::new().expect("tempdir should create");
        let source = sample_tree(temp.path());
        std::os::unix::fs::symlink("README.md", source.join("link.md")).expect("symlink");
        let archive_path = temp.path().join("out.tar.gz");

        TarGzArchiver::default()
            .create_archive(&source, &archive_path)
            .expect("archive should write");

        let mut archive = open_archive(&archive_path).expect("archive should open");
        let link = archive
            .entries()
            .expect("entries should read")
            .map(|entry| entry.expect("entry should read"))
            .find(|entry| entry.path().is_ok_and(|path| path.ends_with("link.md")))
            .expect("link entry present");

        assert!(link.header().entry_type().is_symlink());
        assert_eq!(
            link.link_name().expect("link name").as_deref(),
            Some(Path::new("README.md"))
        );
    }

    #[test]
    fn staging_directory_inside_source_is_left_out() {
        let temp = TempDir::new().expect("tempdir should create");
        let source = sample_tree(temp.path());
        let staging = source.join("keepsake-run");
        fs::create_dir(&staging).expect("staging should create");
        let archive_path = staging.join("out.tar.gz");

        let stats = TarGzArchiver::default()
            .create_archive(&source, &archive_path)
            .expect("archive should write");

        let names = entry_names(&archive_path);
        assert!(names.iter().all(|name| !name.contains("keepsake-run")), "{names:?}");
        assert!(names.contains("projects/src/nested/data.bin"));
        assert_eq!(stats.entries, 7);
    }

    #[cfg(unix)]
    #[test]
    fn sockets_are_skipped() {
        let temp = TempDir::new().expect("tempdir should create");
        let source = sample_tree(temp.path());
        let _listener = std::os::unix::net::UnixListener::bind(source.join("app.sock"))
            .expect("socket should bind");
        let archive_path = temp.path().join("out.tar.gz");

        let stats = TarGzArchiver::default()
            .create_archive(&source, &archive_path)
            .expect("socket must not fail the archive");

        let names = entry_names(&archive_path);
        assert!(!names.contains("projects/app.sock"));
        assert!(names.contains("projects/README.md"));
        assert_eq!(stats.entries, 7);
    }

    #[test]
    fn failure_removes_partial_archive() {
        let temp = TempDir::new().expect("tempdir should create");
        let archive_path = temp.path().join("out.tar.gz");

        let error = TarGzArchiver::default()
            .create_archive(&temp.path().join("vanished"), &archive_path)
            .expect_err("missing source should fail");

        assert_eq!(error.kind(), io::ErrorKind::NotFound);
        assert!(!archive_path.exists());
    }

    #[test]
    fn refuses_to_clobber_existing_staged_file() {
        let temp = TempDir::new().expect("tempdir should create");
        let source = sample_tree(temp.path());
        let archive_path = temp.path().join("out.tar.gz");
        fs::write(&archive_path, "keep me").expect("file should write");

        let error = TarGzArchiver::default()
            .create_archive(&source, &archive_path)
            .expect_err("existing file should fail");

        assert_eq!(error.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&archive_path).expect("file"), "keep me");
    }
}
