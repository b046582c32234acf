// src/error.rs

//! Error types for the feature pipeline.
//!
//! - [`AppError`]: run-level failures (config, storage, I/O). These abort a run.
//! - [`RecordError`]: one raw line could not be turned into a record.
//! - [`FeatureError`]: one feature could not be computed for one record.
//!
//! Only `AppError` ever reaches a caller of the pipeline. The other two are
//! absorbed into [`Diagnostics`](crate::models::Diagnostics).

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Social domain pattern failed to compile
    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage key could not be read or written
    #[error("Storage error for {key}: {message}")]
    Storage { key: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error with context.
    pub fn storage(key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

/// Why a raw scraped line was rejected.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Neither JSON nor a Python literal
    #[error("unparsable line: {0}")]
    Syntax(String),

    /// Parsed, but the top level is not a mapping
    #[error("top level is not a mapping")]
    NotAMapping,

    /// The mapping must hold exactly one title key
    #[error("expected exactly one title key, found {0}")]
    KeyCount(usize),

    /// The title maps to something other than an attribute mapping
    #[error("attributes of {title:?} are not a mapping")]
    AttributesNotMapping { title: String },

    /// Attribute values do not fit the record shape
    #[error("attributes of {title:?} do not fit the record shape: {source}")]
    Shape {
        title: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a single feature could not be computed for a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("bad date {value:?}: {source}")]
    BadDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("bad duration {value:?}: {source}")]
    BadDuration {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("need at least {needed} episodes, found {found}")]
    NotEnoughEpisodes { needed: usize, found: usize },

    #[error("none of {total} episode durations could be parsed")]
    NoParsableDurations { total: usize },

    #[error("`{field}` is not numeric: {value}")]
    NotNumeric { field: &'static str, value: String },

    #[error("first release is {days} days after the latest episode")]
    NegativeAge { days: f64 },
}
