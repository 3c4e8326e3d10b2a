//! Pipeline driver: Reader → Rewriter → Emitter as one pull-based pass.
//!
//! Each statement is read, translated, and emitted before the next is read,
//! so memory use is bounded by the largest single statement. The two public
//! materializations — [`translate`] (SQL script out) and [`load`] (SQLite
//! database out) — wire the same pipeline to different sinks. A failed run is
//! not resumable; it must be restarted from the original dump.

use crate::config::Config;
use crate::core::StatementKind;
use crate::dialect::{count_insert_rows, Rewriter};
use crate::error::Result;
use crate::source::{DumpSource, FileSource, StatementReader};
use crate::target::{FileSink, SqlSink, SqliteSink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, error, info};

/// Pipeline lifecycle state, for diagnostics.
///
/// `Failed` is reachable from any non-terminal state; no state is re-entrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Reading,
    Translating,
    Emitting,
    Done,
    Failed,
}

/// Result of a completed conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertReport {
    /// Unique run identifier.
    pub run_id: String,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Statements read from the dump.
    pub statements_read: u64,

    /// Statements written to the sink.
    pub statements_emitted: u64,

    /// MySQL-only statements dropped by the rewriter.
    pub statements_stripped: u64,

    /// CREATE TABLE statements emitted.
    pub tables_created: u64,

    /// Logical rows across emitted INSERT statements.
    pub rows_inserted: u64,

    /// Bytes consumed from the input stream.
    pub bytes_read: u64,
}

impl ConvertReport {
    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A single-use conversion pipeline.
///
/// Holds only configuration; independent runs over different dumps may
/// execute in parallel on separate instances with no shared state.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Drive the full pass: read statements from `input`, rewrite each, and
    /// emit to `sink`. The sink is finalized before success is reported.
    pub fn run<R: BufRead>(&self, input: R, sink: &mut dyn SqlSink) -> Result<ConvertReport> {
        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        info!(run_id = run_id.as_str(), "starting conversion run");

        match self.run_inner(input, sink) {
            Ok(counters) => {
                let completed_at = Utc::now();
                let report = ConvertReport {
                    run_id,
                    started_at,
                    completed_at,
                    duration_seconds: (completed_at - started_at).num_milliseconds() as f64
                        / 1000.0,
                    statements_read: counters.read,
                    statements_emitted: counters.emitted,
                    statements_stripped: counters.stripped,
                    tables_created: counters.tables,
                    rows_inserted: counters.rows,
                    bytes_read: counters.bytes,
                };
                info!(
                    statements = report.statements_emitted,
                    stripped = report.statements_stripped,
                    "conversion run complete"
                );
                Ok(report)
            }
            Err(e) => {
                error!(run_id = run_id.as_str(), error = %e, "conversion run failed");
                Err(e)
            }
        }
    }

    fn run_inner<R: BufRead>(&self, input: R, sink: &mut dyn SqlSink) -> Result<Counters> {
        let rewriter = Rewriter::new(&self.config.translate);
        let mut reader = StatementReader::new(input);
        let mut counters = Counters::default();
        let mut state = PipelineState::Idle;

        loop {
            transition(&mut state, PipelineState::Reading);
            let Some(next) = reader.next() else { break };
            let stmt = next?;
            counters.read += 1;

            transition(&mut state, PipelineState::Translating);
            let Some(rewritten) = rewriter.rewrite(stmt)? else {
                counters.stripped += 1;
                continue;
            };

            transition(&mut state, PipelineState::Emitting);
            match rewritten.kind {
                StatementKind::CreateTable => counters.tables += 1,
                StatementKind::Insert => counters.rows += count_insert_rows(&rewritten.text),
                StatementKind::Other => {}
            }
            sink.write_statement(&rewritten)?;
            counters.emitted += 1;
        }

        sink.finish()?;
        counters.bytes = reader.bytes_read();
        transition(&mut state, PipelineState::Done);
        Ok(counters)
    }
}

#[derive(Debug, Default)]
struct Counters {
    read: u64,
    emitted: u64,
    stripped: u64,
    tables: u64,
    rows: u64,
    bytes: u64,
}

fn transition(state: &mut PipelineState, next: PipelineState) {
    if *state != next {
        debug!(from = ?state, to = ?next, "pipeline state");
        *state = next;
    }
}

/// Translate a MySQL dump file into a SQLite SQL script.
///
/// Fails fast with [`crate::ConvertError::ResourceUnavailable`] when the
/// input is unreadable or the output cannot be created.
pub fn translate<P, Q>(input: P, output: Q, config: &Config) -> Result<ConvertReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source = FileSource::new(input.as_ref())?;
    let mut sink = FileSink::create(output.as_ref())?;
    info!(
        input = %input.as_ref().display(),
        output = %output.as_ref().display(),
        "translating dump to SQL script"
    );
    Pipeline::new(config.clone()).run(source.open()?, &mut sink)
}

/// Translate a MySQL dump file and load it into a SQLite database.
///
/// The database file is created when missing (configurable); the run fails at
/// the first statement the engine rejects, surfacing the statement text.
pub fn load<P, Q>(input: P, db_path: Q, config: &Config) -> Result<ConvertReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source = FileSource::new(input.as_ref())?;
    let mut sink = SqliteSink::open(db_path.as_ref(), &config.load)?;
    info!(
        input = %input.as_ref().display(),
        db = %db_path.as_ref().display(),
        "loading dump into SQLite database"
    );
    Pipeline::new(config.clone()).run(source.open()?, &mut sink)
}

/// Parse and translate a dump without emitting anything, reporting what a
/// real run would do.
pub fn check<P: AsRef<Path>>(input: P, config: &Config) -> Result<ConvertReport> {
    let source = FileSource::new(input.as_ref())?;
    let mut sink = crate::target::NullSink::new();
    Pipeline::new(config.clone()).run(source.open()?, &mut sink)
}
