//! Filesystem access used by content analysis.
//!
//! The engine only ever needs a file's size and its text, so that is all
//! [`FileSource`] exposes. Tests swap in in-memory sources.

use std::io;
use std::path::Path;

/// Read-only file access for the classification pipeline
pub trait FileSource {
    /// Size of the file in bytes
    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// File contents, decoded as UTF-8 with invalid sequences replaced
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// [`FileSource`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSource;

impl FileSource for LocalFileSource {
    fn file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_source_reads_lossy_utf8() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bin.txt");
        std::fs::write(&path, [b'o', b'k', 0xff]).unwrap();

        let source = LocalFileSource;
        assert_eq!(source.file_size(&path).unwrap(), 3);
        assert_eq!(source.read_to_string(&path).unwrap(), "ok\u{fffd}");
    }

    #[test]
    fn test_local_source_missing_file() {
        let source = LocalFileSource;
        assert!(source.file_size(Path::new("/definitely/not/here")).is_err());
    }
}
