// src/services/sanitizer.rs

//! Per-field cleanup applied to a batch of parsed records.

use serde_json::Value;

use crate::models::{ChannelRecord, SanitizeConfig};

/// What a sanitize pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Records whose `ep_total` was not already an integer
    pub coerced_ep_totals: usize,
    /// Attributes removed across the batch
    pub dropped_fields: usize,
}

/// Coerce a scraped episode count to an integer.
///
/// Integers pass through; finite floats truncate toward zero; booleans map to
/// 0/1; strings must hold a decimal integer. Anything else becomes 0.
/// Idempotent: feeding the result back in returns the same value.
pub fn try_casting_to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(truncate_float))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

fn truncate_float(f: f64) -> Option<i64> {
    let t = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}

/// Applies `ep_total` coercion and removes redundant attributes.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    drop_fields: Vec<String>,
}

impl Sanitizer {
    pub fn new(config: &SanitizeConfig) -> Self {
        Self {
            drop_fields: config.drop_fields.clone(),
        }
    }

    /// Sanitize every record in place.
    pub fn sanitize(&self, records: &mut [ChannelRecord]) -> SanitizeReport {
        let mut report = SanitizeReport::default();
        for record in records.iter_mut() {
            if !record.ep_total.is_i64() {
                let coerced = try_casting_to_int(&record.ep_total);
                log::debug!(
                    "{}: ep_total {} coerced to {}",
                    record.title,
                    record.ep_total,
                    coerced
                );
                record.ep_total = Value::from(coerced);
                report.coerced_ep_totals += 1;
            }

            for field in &self.drop_fields {
                if record.extra.remove(field).is_some() {
                    report.dropped_fields += 1;
                }
            }
        }
        report
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(&SanitizeConfig::default())
    }
}
