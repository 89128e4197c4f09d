//! Export of the acronym list to a text artifact.
//!
//! The artifact is named after the canonical resource file. An existing
//! file is never overwritten; a numbered name is picked instead, the way a
//! browser names repeated downloads.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::codec;
use crate::model::AcronymRecord;

/// File stem of the export artifact.
pub const EXPORT_STEM: &str = "MasterAcronym";
/// File extension of the export artifact.
pub const EXPORT_EXTENSION: &str = "txt";
/// MIME type of the export artifact.
pub const EXPORT_MIME: &str = "text/plain";

/// Upper bound on numbered names tried before giving up.
const MAX_SUFFIX: usize = 1000;

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No free export file name in {0}")]
    NoFreeName(PathBuf),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Canonical artifact file name, e.g. `MasterAcronym.txt`.
pub fn export_file_name() -> String {
    format!("{}.{}", EXPORT_STEM, EXPORT_EXTENSION)
}

/// Candidate file name for the n-th attempt (`MasterAcronym (n).txt` for n > 0).
fn candidate_name(n: usize) -> String {
    if n == 0 {
        export_file_name()
    } else {
        format!("{} ({}).{}", EXPORT_STEM, n, EXPORT_EXTENSION)
    }
}

/// Encodes `records` and writes them to a new file in `dir`.
///
/// Returns the path that was written.
pub fn export(records: &[AcronymRecord], dir: &Path) -> ExportResult<PathBuf> {
    let content = codec::encode(records);

    for n in 0..MAX_SUFFIX {
        let path = dir.join(candidate_name(n));
        // create_new makes the existence check and the create one step
        let file = OpenOptions::new().write(true).create_new(true).open(&path);
        let file = match file {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(ExportError::Write { path, source }),
        };

        write_or_remove(file, &path, &content)
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;

        info!(count = records.len(), path = %path.display(), mime = EXPORT_MIME, "exported acronyms");
        return Ok(path);
    }

    Err(ExportError::NoFreeName(dir.to_path_buf()))
}

/// Writes `content` to the freshly created `path`, removing it on failure
/// so the name is free for the next export.
fn write_or_remove<W: Write>(mut out: W, path: &Path, content: &str) -> io::Result<()> {
    let written = out.write_all(content.as_bytes()).and_then(|()| out.flush());
    if written.is_err() {
        drop(out);
        let _ = fs::remove_file(path);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Writer that fails after accepting a few bytes.
    struct ShortWriter {
        left: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.left == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            let n = buf.len().min(self.left);
            self.left -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sample() -> Vec<AcronymRecord> {
        vec![
            AcronymRecord::new("NASA", "National Aeronautics"),
            AcronymRecord::new("FBI", "Federal Bureau"),
        ]
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(), "MasterAcronym.txt");
        assert_eq!(candidate_name(0), "MasterAcronym.txt");
        assert_eq!(candidate_name(2), "MasterAcronym (2).txt");
    }

    #[test]
    fn test_export_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(&sample(), dir.path()).unwrap();

        assert_eq!(path, dir.path().join("MasterAcronym.txt"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "FBI|Federal Bureau\nNASA|National Aeronautics"
        );
    }

    #[test]
    fn test_export_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("MasterAcronym.txt"), "keep me").unwrap();

        let first = export(&sample(), dir.path()).unwrap();
        let second = export(&sample(), dir.path()).unwrap();

        assert_eq!(first, dir.path().join("MasterAcronym (1).txt"));
        assert_eq!(second, dir.path().join("MasterAcronym (2).txt"));
        assert_eq!(fs::read_to_string(dir.path().join("MasterAcronym.txt")).unwrap(), "keep me");
    }

    #[test]
    fn test_export_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(&[], dir.path()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn test_export_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = export(&sample(), &dir.path().join("missing"));
        assert!(matches!(result, Err(ExportError::Write { .. })));
    }

    #[test]
    fn test_failed_write_frees_the_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export_file_name());
        fs::write(&path, "FBI|Fed").unwrap();

        let result = write_or_remove(ShortWriter { left: 7 }, &path, "FBI|Federal Bureau");
        assert!(result.is_err());
        assert!(!path.exists());

        // The canonical name is used again by the next export
        let next = export(&sample(), dir.path()).unwrap();
        assert_eq!(next, path);
    }
}
