//! Error types for the folio core library.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for folio.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Grammar, section-count or number-parse violation in the profile text.
    #[error("syntax error in {section} section: {message}{}", quoted(.line))]
    ConfigSyntax {
        section: String,
        line: Option<String>,
        message: String,
    },

    /// Response envelope could not be read or carries no data mapping.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote API reported errors.
    #[error("API error (1/{count}): {message}")]
    Api { message: String, count: usize },

    /// A response fragment did not match the expected shape.
    #[error("decode error in {item} at {path}: {message}")]
    Decode {
        item: String,
        path: String,
        message: String,
    },

    /// Settings loading or validation error.
    #[error("settings error: {message}")]
    Settings {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic configuration crate error.
    #[error("config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

fn quoted(line: &Option<String>) -> String {
    line.as_ref()
        .map(|l| format!(": \"{l}\""))
        .unwrap_or_default()
}

impl CoreError {
    /// Create a syntax error for a whole section.
    pub fn syntax(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigSyntax {
            section: section.into(),
            line: None,
            message: message.into(),
        }
    }

    /// Create a syntax error quoting the offending line.
    pub fn syntax_at(
        section: impl Into<String>,
        line: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ConfigSyntax {
            section: section.into(),
            line: Some(line.into()),
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a decode error for a response item.
    pub fn decode(
        item: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Decode {
            item: item.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new settings error with a message.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new settings error with source.
    pub fn settings_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Settings {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_quotes_line() {
        let err = CoreError::syntax_at("contributions", "octocat/hello abc 3", "bad pull number");
        let msg = err.to_string();
        assert!(msg.contains("contributions section"));
        assert!(msg.contains("\"octocat/hello abc 3\""));
    }

    #[test]
    fn test_syntax_error_without_line() {
        let err = CoreError::syntax("profile", "expected 4 sections, found 2");
        assert_eq!(
            err.to_string(),
            "syntax error in profile section: expected 4 sections, found 2"
        );
    }

    #[test]
    fn test_api_error() {
        let err = CoreError::Api {
            message: "Could not resolve to a User".to_string(),
            count: 2,
        };
        assert_eq!(err.to_string(), "API error (1/2): Could not resolve to a User");
    }

    #[test]
    fn test_decode_error() {
        let err = CoreError::decode("p1", "stargazers.totalCount", "invalid type");
        assert!(err.to_string().contains("p1"));
        assert!(err.to_string().contains("stargazers.totalCount"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CoreError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }
}
