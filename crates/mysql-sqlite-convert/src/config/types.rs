//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Root configuration structure.
///
/// The configuration is owned by the caller and passed into the pipeline at
/// construction; the library keeps no process-wide state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Translation behavior.
    #[serde(default)]
    pub translate: TranslateConfig,

    /// Database-load behavior.
    #[serde(default)]
    pub load: LoadConfig,
}

/// Translation behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// What to do with recognized MySQL-only statements (default: skip).
    #[serde(default)]
    pub on_unsupported: UnsupportedPolicy,

    /// Emit a CHECK constraint over the literals of an ENUM column
    /// (default: true).
    #[serde(default = "default_true")]
    pub enum_checks: bool,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            on_unsupported: UnsupportedPolicy::default(),
            enum_checks: true,
        }
    }
}

/// Database-load behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Create the target database file when it does not exist (default: true).
    #[serde(default = "default_true")]
    pub create_missing: bool,

    /// PRAGMA assignments applied to the connection before loading,
    /// e.g. `journal_mode = MEMORY` or `synchronous = OFF`.
    #[serde(default)]
    pub pragmas: Vec<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            create_missing: true,
            pragmas: Vec::new(),
        }
    }
}

/// Policy for recognized-but-untranslatable statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedPolicy {
    /// Drop the statement and continue (the dump still loads).
    #[default]
    Skip,

    /// Abort the run at the first such statement.
    Fail,
}

fn default_true() -> bool {
    true
}
