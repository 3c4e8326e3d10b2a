//! Core data types shared across the pipeline.

mod statement;

pub use statement::{Statement, StatementKind};
