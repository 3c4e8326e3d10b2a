//! Embedded SQLite database sink.
//!
//! Statements are executed one at a time against an in-process
//! [`rusqlite::Connection`]; the first statement the engine rejects aborts
//! the run with the offending statement text. This replaces piping the
//! translated script into an external `sqlite3` binary — no engine process
//! needs to exist on the host, and tests can load into `:memory:`.

use super::SqlSink;
use crate::config::LoadConfig;
use crate::core::Statement;
use crate::error::{ConvertError, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// Applies translated statements to a SQLite database.
#[derive(Debug)]
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Open (or create) the target database file.
    ///
    /// With `create_missing` disabled, a missing file is a
    /// [`ConvertError::ResourceUnavailable`]. Configured pragmas are applied
    /// to the connection before any statement is loaded.
    pub fn open<P: AsRef<Path>>(path: P, config: &LoadConfig) -> Result<Self> {
        let path = path.as_ref();
        if !config.create_missing && !path.exists() {
            return Err(ConvertError::resource(
                path.display().to_string(),
                "target database does not exist and load.create_missing is false",
            ));
        }
        let conn = Connection::open(path)
            .map_err(|e| ConvertError::resource(path.display().to_string(), e.to_string()))?;
        Self::with_connection(conn, config)
    }

    /// Build a sink over an in-memory database (tests, dry runs).
    pub fn in_memory(config: &LoadConfig) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, config)
    }

    fn with_connection(conn: Connection, config: &LoadConfig) -> Result<Self> {
        for pragma in &config.pragmas {
            debug!(pragma = pragma.as_str(), "applying pragma");
            conn.execute_batch(&format!("PRAGMA {};", pragma.trim()))?;
        }
        Ok(Self { conn })
    }

    /// Borrow the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consume the sink, returning the connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl SqlSink for SqliteSink {
    fn write_statement(&mut self, stmt: &Statement) -> Result<()> {
        self.conn
            .execute_batch(&format!("{};", stmt.text))
            .map_err(|e| ConvertError::sink_write(&stmt.text, e.to_string()))
    }

    fn finish(&mut self) -> Result<()> {
        // Connection writes are durable per statement; nothing is buffered.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(text: &str) -> Statement {
        Statement::classify(text.to_string(), 0)
    }

    #[test]
    fn test_statements_apply_in_order() {
        let mut sink = SqliteSink::in_memory(&LoadConfig::default()).unwrap();
        sink.write_statement(&stmt("CREATE TABLE \"t\" (\"a\" INTEGER)"))
            .unwrap();
        sink.write_statement(&stmt("INSERT INTO \"t\" VALUES (1), (2)"))
            .unwrap();
        sink.finish().unwrap();

        let count: i64 = sink
            .connection()
            .query_row("SELECT COUNT(*) FROM \"t\"", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_rejection_carries_statement_text() {
        let mut sink = SqliteSink::in_memory(&LoadConfig::default()).unwrap();
        let err = sink
            .write_statement(&stmt("INSERT INTO missing VALUES (1)"))
            .unwrap_err();
        match err {
            ConvertError::SinkWrite { statement, reason } => {
                assert_eq!(statement, "INSERT INTO missing VALUES (1)");
                assert!(reason.contains("missing"));
            }
            other => panic!("expected SinkWrite, got {other:?}"),
        }
    }

    #[test]
    fn test_pragmas_are_applied() {
        let config = LoadConfig {
            pragmas: vec!["journal_mode = MEMORY".to_string()],
            ..LoadConfig::default()
        };
        let sink = SqliteSink::in_memory(&config).unwrap();
        let mode: String = sink
            .connection()
            .query_row("PRAGMA journal_mode", [], |r| r.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "memory");
    }

    #[test]
    fn test_missing_db_without_create_missing() {
        let config = LoadConfig {
            create_missing: false,
            ..LoadConfig::default()
        };
        let err = SqliteSink::open("/tmp/definitely-not-here-42.db", &config).unwrap_err();
        assert!(matches!(err, ConvertError::ResourceUnavailable { .. }));
    }
}
