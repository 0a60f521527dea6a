//! website-checker: a concurrent broken-link crawler
//!
//! This crate crawls a website from a set of seed URLs, follows every link,
//! image, script and stylesheet reference it finds, and records the HTTP status
//! and outbound references of each unique URL. Embedded JSON-LD blocks can
//! optionally be checked against an external structured-data validator.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for website-checker operations
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Structured data validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    #[error("No result recorded for {url} before its structured data was processed")]
    MissingPage { url: String },

    #[error("Worker task failed: {0}")]
    Worker(String),

    #[error("Crawl aborted after {} error(s): {}", .0.len(), join_errors(.0))]
    Aborted(Vec<CheckerError>),
}

impl CheckerError {
    /// Wraps the errors observed during a crawl into a single aggregate
    pub fn aborted(errors: Vec<CheckerError>) -> Self {
        Self::Aborted(errors)
    }
}

fn join_errors(errors: &[CheckerError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("cannot resolve '{reference}': {source}")]
    Invalid {
        reference: String,
        source: ::url::ParseError,
    },
}

/// Errors returned by a structured data validator
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("validator request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("validator returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Result type alias for website-checker operations
pub type Result<T> = std::result::Result<T, CheckerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Options;
pub use crawler::Checker;
pub use state::{CheckResult, PageResult, StructuredDataReport};
pub use crate::url::{resolve, IgnoreFilter, Resolved};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aborted_message_joins_errors() {
        let errors = vec![
            CheckerError::Worker("first".to_string()),
            CheckerError::MissingPage {
                url: "http://example.com/".to_string(),
            },
        ];
        let message = CheckerError::aborted(errors).to_string();

        assert!(message.starts_with("Crawl aborted after 2 error(s)"));
        assert!(message.contains("Worker task failed: first; "));
        assert!(message.contains("http://example.com/"));
    }

    #[test]
    fn test_invalid_url_message() {
        let source = ::url::Url::parse("not a url").unwrap_err();
        let err: CheckerError = UrlError::Invalid {
            reference: "not a url".to_string(),
            source,
        }
        .into();
        assert!(err.to_string().contains("cannot resolve 'not a url'"));
    }
}
