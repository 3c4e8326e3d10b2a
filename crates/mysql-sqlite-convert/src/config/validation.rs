//! Configuration validation.

use super::Config;
use crate::error::{ConvertError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    for pragma in &config.load.pragmas {
        let trimmed = pragma.trim();
        if trimmed.is_empty() {
            return Err(ConvertError::Config(
                "load.pragmas entries must not be empty".into(),
            ));
        }
        // Pragmas are spliced into PRAGMA statements; reject anything that
        // could smuggle in extra statements or comments.
        if trimmed.contains(';') || trimmed.contains("--") || trimmed.contains("/*") {
            return Err(ConvertError::Config(format!(
                "load.pragmas entry contains statement separators or comments: {:?}",
                pragma
            )));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '=' | ' ' | '(' | ')'))
        {
            return Err(ConvertError::Config(format!(
                "load.pragmas entry contains unexpected characters: {:?}",
                pragma
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadConfig;

    fn config_with_pragmas(pragmas: &[&str]) -> Config {
        Config {
            load: LoadConfig {
                pragmas: pragmas.iter().map(|s| s.to_string()).collect(),
                ..LoadConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_reasonable_pragmas_pass() {
        let config = config_with_pragmas(&["journal_mode = MEMORY", "synchronous = OFF"]);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_pragma_with_semicolon_rejected() {
        let config = config_with_pragmas(&["synchronous = OFF; DROP TABLE users"]);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_pragma_with_comment_rejected() {
        let config = config_with_pragmas(&["synchronous = OFF -- sneaky"]);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_pragma_rejected() {
        let config = config_with_pragmas(&["  "]);
        assert!(validate(&config).is_err());
    }
}
