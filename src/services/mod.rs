//! Service layer for the feature pipeline.
//!
//! This module contains the business logic for:
//! - Raw line parsing (`RecordParser`)
//! - Record cleanup (`Sanitizer`)
//! - Feature derivation (`FeatureEngine`)
//! - Side-table lookups (`ExternalLookup`)

pub mod features;
mod lookup;
mod parser;
mod sanitizer;

pub use features::{FeatureEngine, SPACING_FALLBACK};
pub use lookup::{ExternalLookup, FollowerMetrics};
pub use parser::RecordParser;
pub use sanitizer::{SanitizeReport, Sanitizer, try_casting_to_int};
