//! Data-quality diagnostics collected during a build.
//!
//! Nothing in a build is fatal at the record level. Lines that fail to parse,
//! fields that needed coercion and features that fell back to their default
//! are tallied here instead, so the failure rate stays visible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// One feature that fell back to its default for one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFailure {
    pub title: String,
    pub category: String,
    pub column: String,
    pub reason: String,
}

/// Counters and failure log for a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Non-blank raw lines seen
    pub lines_read: usize,
    /// Lines discarded because they did not parse into a record
    pub lines_discarded: usize,
    /// Records whose `ep_total` was not an integer
    pub ep_totals_coerced: usize,
    /// Attributes removed by the sanitizer
    pub fields_dropped: usize,
    /// Every feature fallback, in build order
    pub failures: Vec<FeatureFailure>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a feature fallback.
    pub fn record_failure(
        &mut self,
        title: &str,
        category: &str,
        column: &str,
        error: &FeatureError,
    ) {
        log::debug!(
            "[{}] {}: {} fell back to default ({})",
            category,
            title,
            column,
            error
        );
        self.failures.push(FeatureFailure {
            title: title.to_string(),
            category: category.to_string(),
            column: column.to_string(),
            reason: error.to_string(),
        });
    }

    /// Number of fallbacks per column.
    pub fn failure_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for failure in &self.failures {
            *counts.entry(failure.column.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Fold another build's diagnostics into this one.
    pub fn absorb(&mut self, other: Diagnostics) {
        self.lines_read += other.lines_read;
        self.lines_discarded += other.lines_discarded;
        self.ep_totals_coerced += other.ep_totals_coerced;
        self.fields_dropped += other.fields_dropped;
        self.failures.extend(other.failures);
    }
}
