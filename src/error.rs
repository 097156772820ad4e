//! Configuration error taxonomy
//!
//! Display strings are the exact messages the CLI prints, so callers can
//! report any `ConfigError` with a bare `eprintln!`.

use std::io;

/// Errors raised while loading, parsing, or updating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed line in a config file: bad section header, bad key
    /// character, unknown escape, unterminated quote
    #[error("bad config file line {line} in {path}")]
    Syntax { path: String, line: u32 },

    /// A value failed typed coercion, no file context known
    #[error("bad config value for '{key}'")]
    BadValue { key: String },

    /// A value read from a known file failed typed coercion
    #[error("bad config value for '{key}' in {path}")]
    BadFileValue { key: String, path: String },

    /// Dotted key given without a section part
    #[error("The config variable does not contain a section: {key}")]
    MissingSection { key: String },

    /// Dotted key ends at the section, nothing after the dot
    #[error("The config variable does not contain a variable name: {key}")]
    MissingName { key: String },

    /// `section.name=` with an empty value on the command line
    #[error("The config variable does not contain a value: {key}")]
    MissingValue { key: String },

    /// Key contains characters outside the config grammar
    #[error("invalid key: {key}")]
    InvalidKey { key: String },

    #[error("config file access failed: {0}")]
    Io(#[from] io::Error),
}

impl ConfigError {
    /// Syntax error at `line` of the file named `path`
    pub fn syntax(path: impl Into<String>, line: u32) -> Self {
        ConfigError::Syntax {
            path: path.into(),
            line,
        }
    }

    /// Coercion failure for `key`, without file context
    pub fn bad_value(key: impl Into<String>) -> Self {
        ConfigError::BadValue { key: key.into() }
    }

    /// Coercion failure for `key` in the file named `path`
    pub fn bad_file_value(key: impl Into<String>, path: impl Into<String>) -> Self {
        ConfigError::BadFileValue {
            key: key.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_message() {
        let err = ConfigError::syntax("/etc/perfconfig", 7);
        assert_eq!(err.to_string(), "bad config file line 7 in /etc/perfconfig");
    }

    #[test]
    fn test_bad_value_messages() {
        let err = ConfigError::bad_value("colors.top");
        assert_eq!(err.to_string(), "bad config value for 'colors.top'");

        let err = ConfigError::bad_file_value("colors.top", "/home/u/.perfconfig");
        assert_eq!(
            err.to_string(),
            "bad config value for 'colors.top' in /home/u/.perfconfig"
        );
    }

    #[test]
    fn test_key_split_messages() {
        let err = ConfigError::MissingSection {
            key: "top".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The config variable does not contain a section: top"
        );

        let err = ConfigError::MissingName {
            key: "colors.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The config variable does not contain a variable name: colors."
        );
    }
}
