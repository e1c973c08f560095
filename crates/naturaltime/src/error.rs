//! Error types for naturaltime operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NaturalTimeError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A caller asked for exactly one range and the expression produced another count.
    #[error("Ambiguous expression: expected a single range from '{expression}', got {count}")]
    Ambiguous { expression: String, count: usize },

    #[error("Serialization error for '{expression}': {source}")]
    Serialization {
        expression: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, NaturalTimeError>;
