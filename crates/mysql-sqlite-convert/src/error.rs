//! Error types for the conversion library.

use thiserror::Error;

/// Main error type for conversion operations.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The dump stream ended mid-statement (unterminated quote, comment,
    /// or a statement missing its terminator).
    #[error("Malformed dump at byte offset {offset}: {detail}")]
    MalformedDump { offset: u64, detail: String },

    /// A recognized-but-untranslatable statement was encountered while the
    /// unsupported-statement policy is `fail`.
    #[error("Unsupported construct (policy is 'fail'): {statement}")]
    UnsupportedConstruct { statement: String },

    /// The output sink rejected a write.
    #[error("Sink rejected statement: {reason}\n  Statement: {statement}")]
    SinkWrite { statement: String, reason: String },

    /// Input path unreadable, or target path cannot be created/opened.
    #[error("Resource unavailable: {path}: {reason}")]
    ResourceUnavailable { path: String, reason: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Embedded SQLite engine error outside statement execution
    /// (statement rejections are reported as [`ConvertError::SinkWrite`]).
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl ConvertError {
    /// Create a MalformedDump error.
    pub fn malformed(offset: u64, detail: impl Into<String>) -> Self {
        ConvertError::MalformedDump {
            offset,
            detail: detail.into(),
        }
    }

    /// Create a SinkWrite error carrying the offending statement text.
    pub fn sink_write(statement: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvertError::SinkWrite {
            statement: statement.into(),
            reason: reason.into(),
        }
    }

    /// Create a ResourceUnavailable error for a path.
    pub fn resource(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvertError::ResourceUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Map the error to a process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::Config(_) => 2,
            ConvertError::ResourceUnavailable { .. } => 3,
            ConvertError::MalformedDump { .. } => 4,
            ConvertError::UnsupportedConstruct { .. } => 5,
            ConvertError::SinkWrite { .. } => 6,
            _ => 1,
        }
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_carries_offset() {
        let err = ConvertError::malformed(42, "unterminated string literal");
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("unterminated string literal"));
    }

    #[test]
    fn test_sink_write_message_carries_statement() {
        let err = ConvertError::sink_write("INSERT INTO t VALUES (1)", "disk full");
        let msg = err.to_string();
        assert!(msg.contains("INSERT INTO t VALUES (1)"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let errs = [
            ConvertError::Config("x".into()),
            ConvertError::resource("/p", "denied"),
            ConvertError::malformed(0, "eof"),
            ConvertError::UnsupportedConstruct {
                statement: "SET NAMES utf8".into(),
            },
            ConvertError::sink_write("s", "r"),
        ];
        let codes: Vec<u8> = errs.iter().map(|e| e.exit_code()).collect();
        let mut deduped = codes.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(codes.len(), deduped.len());
    }
}
