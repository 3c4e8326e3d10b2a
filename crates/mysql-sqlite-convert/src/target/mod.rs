//! Output sinks for translated statements.
//!
//! A [`SqlSink`] is the seam between the pipeline and whatever consumes the
//! translated SQL — a script file, an embedded SQLite database, or a test
//! fake. Sinks receive statements in input order and must not reorder or
//! buffer beyond a single statement; a write is atomic per statement, and a
//! run that fails midway leaves whatever was already written (documented
//! streaming behavior, not a defect).

mod file;
mod sqlite;

pub use file::FileSink;
pub use sqlite::SqliteSink;

use crate::core::Statement;
use crate::error::Result;

/// An ordered, append-only destination for translated statements.
pub trait SqlSink {
    /// Write one terminated statement.
    fn write_statement(&mut self, stmt: &Statement) -> Result<()>;

    /// Flush and finalize the sink. Must be called exactly once, after the
    /// last statement; success is not reported until this returns.
    fn finish(&mut self) -> Result<()>;
}

/// A sink that discards statements, for parse/translate-only runs.
#[derive(Debug, Default)]
pub struct NullSink {
    written: u64,
}

impl NullSink {
    /// Create a discarding sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of statements received.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl SqlSink for NullSink {
    fn write_statement(&mut self, _stmt: &Statement) -> Result<()> {
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
