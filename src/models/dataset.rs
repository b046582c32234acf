//! Persisted feature datasets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Diagnostics, FeatureRow};

/// One category's rows (or the merged rows of several), written wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Category name, or the merged dataset's name
    pub name: String,
    /// When the rows were built
    pub built_at: DateTime<Utc>,
    /// Row count
    pub count: usize,
    pub rows: Vec<FeatureRow>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, rows: Vec<FeatureRow>) -> Self {
        Self {
            name: name.into(),
            built_at: Utc::now(),
            count: rows.len(),
            rows,
        }
    }
}

/// Summary of one category inside a run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    pub rows: usize,
    pub lines_discarded: usize,
    pub fallbacks: usize,
}

/// Written to the storage root after every build run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub groups: Vec<String>,
    pub categories: Vec<CategorySummary>,
    pub merged_rows: usize,
    pub diagnostics: Diagnostics,
}
