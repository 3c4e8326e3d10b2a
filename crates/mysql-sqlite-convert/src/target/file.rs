//! File-backed SQL script sink.

use super::SqlSink;
use crate::core::Statement;
use crate::error::{ConvertError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes translated statements to a SQL script, one per line, terminated by
/// `;` and a newline.
#[derive(Debug)]
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create (or truncate) the output file, failing fast when the path
    /// cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| ConvertError::resource(path.display().to_string(), e.to_string()))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl SqlSink for FileSink {
    fn write_statement(&mut self, stmt: &Statement) -> Result<()> {
        self.writer
            .write_all(stmt.text.as_bytes())
            .and_then(|_| self.writer.write_all(b";\n"))
            .map_err(|e| ConvertError::sink_write(&stmt.text, e.to_string()))
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_terminated_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.sql");
        let mut sink = FileSink::create(&path).unwrap();
        sink.write_statement(&Statement::classify("CREATE TABLE \"t\" (\"a\" int)".into(), 0))
            .unwrap();
        sink.write_statement(&Statement::classify("INSERT INTO \"t\" VALUES (1)".into(), 0))
            .unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "CREATE TABLE \"t\" (\"a\" int);\nINSERT INTO \"t\" VALUES (1);\n"
        );
    }

    #[test]
    fn test_uncreatable_path_is_resource_error() {
        let err = FileSink::create("/no/such/dir/out.sql").unwrap_err();
        assert!(matches!(err, ConvertError::ResourceUnavailable { .. }));
    }
}
