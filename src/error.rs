//! Error types for the APEX crate

use thiserror::Error;

/// Main error type for the APEX crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("action {value} is out of range (must be 1-10)")]
    InvalidAction { value: u8 },

    #[error("distribution over actions sums to {sum}, expected 1.0")]
    InvalidDistribution { sum: f64 },

    #[error("probability {value} at action {action} must be finite and non-negative")]
    InvalidProbability { action: u8, value: f64 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid rule policy '{input}'. Expected one of: {expected}")]
    ParseRuleKind { input: String, expected: String },

    #[error("invalid environment '{input}'. Expected one of: {expected}")]
    ParseEnvironment { input: String, expected: String },

    #[error("tournament needs at least 2 agents, got {count}")]
    NotEnoughAgents { count: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
