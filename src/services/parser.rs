// src/services/parser.rs

//! Raw scrape line parser.
//!
//! Each line of a category file is a one-key mapping `{title: {attributes}}`,
//! written either as JSON or as a Python dict literal.

use serde_json::Value;

use crate::error::RecordError;
use crate::models::ChannelRecord;
use crate::utils::pyliteral;

/// Turns raw scraped lines into [`ChannelRecord`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser;

impl RecordParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one line. Blank lines yield `Ok(None)`; they separate records in
    /// older scrape files.
    pub fn parse_line(&self, line: &str) -> Result<Option<ChannelRecord>, RecordError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let value = Self::decode(line)?;
        Self::into_record(value).map(Some)
    }

    /// Decode a line as JSON, falling back to a Python literal.
    fn decode(line: &str) -> Result<Value, RecordError> {
        match serde_json::from_str(line) {
            Ok(value) => Ok(value),
            Err(json_err) => pyliteral::to_json(line)
                .and_then(|json| serde_json::from_str(&json).ok())
                .ok_or_else(|| RecordError::Syntax(json_err.to_string())),
        }
    }

    fn into_record(value: Value) -> Result<ChannelRecord, RecordError> {
        let Value::Object(outer) = value else {
            return Err(RecordError::NotAMapping);
        };
        if outer.len() != 1 {
            return Err(RecordError::KeyCount(outer.len()));
        }
        let Some((title, attributes)) = outer.into_iter().next() else {
            return Err(RecordError::KeyCount(0));
        };
        let Value::Object(mut attributes) = attributes else {
            return Err(RecordError::AttributesNotMapping { title });
        };

        // The outer key is authoritative.
        attributes.insert("title".to_string(), Value::String(title.clone()));

        serde_json::from_value(Value::Object(attributes))
            .map_err(|source| RecordError::Shape { title, source })
    }
}
