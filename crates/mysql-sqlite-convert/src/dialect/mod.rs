//! Dialect rewriting: one MySQL statement in, zero or one SQLite statement out.
//!
//! Rules are applied in a fixed precedence order:
//!
//! 1. Statements with no SQLite meaning are stripped entirely (`SET`,
//!    `LOCK/UNLOCK TABLES`, `USE`, `CREATE/DROP DATABASE`, `/*!...*/`
//!    version-conditional statements).
//! 2. Backtick identifier quoting becomes double-quote quoting.
//! 3. `CREATE TABLE` definitions are rewritten structurally ([`schema`]).
//! 4. Type names with no SQLite equivalent map to the nearest storage class
//!    ([`crate::typemap`]).
//! 5. MySQL escape sequences inside `INSERT` literals are converted
//!    ([`values`]).
//! 6. Anything else passes through unchanged — the rewriter never tries to
//!    "fix" syntax it does not recognize.

mod schema;
mod values;

pub use values::count_insert_rows;

use crate::config::{TranslateConfig, UnsupportedPolicy};
use crate::core::{Statement, StatementKind};
use crate::error::{ConvertError, Result};
use tracing::debug;

/// Statement-level MySQL → SQLite rewriter.
///
/// Stateless across statements; a single instance can be shared by any number
/// of sequential pipeline runs.
#[derive(Debug, Clone)]
pub struct Rewriter {
    on_unsupported: UnsupportedPolicy,
    enum_checks: bool,
}

impl Rewriter {
    /// Build a rewriter from translation configuration.
    pub fn new(config: &TranslateConfig) -> Self {
        Self {
            on_unsupported: config.on_unsupported,
            enum_checks: config.enum_checks,
        }
    }

    /// Rewrite one statement.
    ///
    /// Returns `Ok(None)` when the statement has no SQLite meaning and the
    /// policy is `skip`; fails with [`ConvertError::UnsupportedConstruct`]
    /// under the `fail` policy.
    pub fn rewrite(&self, stmt: Statement) -> Result<Option<Statement>> {
        if is_mysql_only(&stmt.text) {
            match self.on_unsupported {
                UnsupportedPolicy::Skip => {
                    debug!(statement = stmt.text.as_str(), "stripping MySQL-only statement");
                    return Ok(None);
                }
                UnsupportedPolicy::Fail => {
                    return Err(ConvertError::UnsupportedConstruct {
                        statement: stmt.text,
                    });
                }
            }
        }

        let text = match stmt.kind {
            StatementKind::CreateTable => schema::rewrite_create_table(&stmt.text, self.enum_checks),
            StatementKind::Insert => values::rewrite_insert(&stmt.text),
            StatementKind::Other => rewrite_other(&stmt.text),
        };

        Ok(Some(stmt.with_text(text)))
    }
}

/// Statements that exist only for a MySQL server session or storage engine.
fn is_mysql_only(text: &str) -> bool {
    if text.starts_with("/*!") {
        return true;
    }
    let mut words = text.split_whitespace();
    let first = words.next().unwrap_or("").to_uppercase();
    let second = words.next().unwrap_or("").to_uppercase();
    match first.as_str() {
        "SET" | "USE" | "DELIMITER" => true,
        "LOCK" | "UNLOCK" => second == "TABLES",
        "CREATE" | "DROP" => second == "DATABASE" || second == "SCHEMA",
        _ => false,
    }
}

fn rewrite_other(text: &str) -> String {
    // START TRANSACTION is MySQL spelling; SQLite only accepts BEGIN.
    let mut words = text.split_whitespace();
    if words.next().is_some_and(|w| w.eq_ignore_ascii_case("START"))
        && words
            .next()
            .is_some_and(|w| w.eq_ignore_ascii_case("TRANSACTION"))
    {
        return "BEGIN".to_string();
    }
    values::requote_identifiers(text)
}
