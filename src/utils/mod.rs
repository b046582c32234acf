//! Utility functions and helpers.

pub mod dates;
pub mod fs;
pub mod progress;
pub mod pyliteral;
pub mod url;
