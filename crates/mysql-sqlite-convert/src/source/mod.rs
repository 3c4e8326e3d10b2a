//! Dump stream sources.
//!
//! A [`DumpSource`] is anything that can hand the pipeline a forward-readable
//! stream of MySQL-dialect SQL text. Producing such a stream (connecting to a
//! server, running a dump utility) is outside the pipeline's responsibility;
//! the shipped implementation is [`FileSource`], and tests feed in-memory
//! cursors directly.

mod reader;

pub use reader::StatementReader;

use crate::error::{ConvertError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// A producer of a readable SQL dump stream.
pub trait DumpSource {
    /// Open the dump for reading.
    fn open(&self) -> Result<Box<dyn BufRead>>;
}

/// A dump stored in a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for the given path, failing fast if it is unreadable.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_readable(&path)?;
        Ok(Self { path })
    }

    /// The underlying path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DumpSource for FileSource {
    fn open(&self) -> Result<Box<dyn BufRead>> {
        let file = File::open(&self.path)
            .map_err(|e| ConvertError::resource(self.path.display().to_string(), e.to_string()))?;
        Ok(Box::new(BufReader::with_capacity(64 * 1024, file)))
    }
}

/// Fail fast with [`ConvertError::ResourceUnavailable`] if a path cannot be read.
pub fn ensure_readable(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(ConvertError::resource(
            path.display().to_string(),
            "is a directory, expected a file",
        )),
        Ok(_) => Ok(()),
        Err(e) => Err(ConvertError::resource(
            path.display().to_string(),
            e.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn test_file_source_reads_back() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "SELECT 1;").unwrap();
        let source = FileSource::new(tmp.path()).unwrap();
        let mut content = String::new();
        source.open().unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "SELECT 1;");
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let err = FileSource::new("/no/such/dump.sql").unwrap_err();
        assert!(matches!(err, ConvertError::ResourceUnavailable { .. }));
    }

    #[test]
    fn test_directory_is_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::new(dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::ResourceUnavailable { .. }));
    }
}
