//! # mysql-sqlite-convert
//!
//! Streaming MySQL dump to SQLite translation library.
//!
//! This library converts a MySQL-dialect SQL dump into SQLite-compatible
//! form, as either a translated SQL script or a materialized SQLite database
//! file, with support for:
//!
//! - **Streaming translation** bounded by the largest single statement, not
//!   the dump size
//! - **Dialect rewriting** (backtick identifiers, `AUTO_INCREMENT`, `ENGINE`
//!   and charset clauses, MySQL type names and escape sequences)
//! - **Embedded loading** via an in-process SQLite engine — no external
//!   `sqlite3` binary required
//! - **Injectable sinks** so tests can capture output or load into memory
//!
//! ## Example
//!
//! ```rust,no_run
//! use mysql_sqlite_convert::{translate, load, Config};
//!
//! fn main() -> mysql_sqlite_convert::Result<()> {
//!     let config = Config::default();
//!     let report = translate("dump.sql", "dump_sqlite.sql", &config)?;
//!     println!("Translated {} statements", report.statements_emitted);
//!
//!     let report = load("dump.sql", "app.db", &config)?;
//!     println!("Loaded {} rows", report.rows_inserted);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod dialect;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod target;
pub mod typemap;

// Re-exports for convenient access
pub use config::{Config, LoadConfig, TranslateConfig, UnsupportedPolicy};
pub use self::core::{Statement, StatementKind};
pub use dialect::Rewriter;
pub use error::{ConvertError, Result};
pub use pipeline::{check, load, translate, ConvertReport, Pipeline, PipelineState};
pub use source::{DumpSource, FileSource, StatementReader};
pub use target::{FileSink, NullSink, SqlSink, SqliteSink};
