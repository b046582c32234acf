// src/pipeline/build.rs

//! Builds one category's feature dataset from raw scrape lines.

use crate::models::{Dataset, Diagnostics, FeatureGroups, FeatureRow};
use crate::services::{FeatureEngine, RecordParser, Sanitizer};

/// Parse → sanitize → label → derive, for one category at a time.
pub struct DatasetBuilder<'a> {
    parser: RecordParser,
    sanitizer: &'a Sanitizer,
    engine: &'a FeatureEngine,
    groups: FeatureGroups,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(sanitizer: &'a Sanitizer, engine: &'a FeatureEngine, groups: FeatureGroups) -> Self {
        Self {
            parser: RecordParser::new(),
            sanitizer,
            engine,
            groups,
        }
    }

    /// Build a category dataset. Unparsable lines are dropped and counted;
    /// nothing about a single line or record can fail the build.
    pub fn build_category<I, S>(&self, category: &str, lines: I, diag: &mut Diagnostics) -> Dataset
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut records = Vec::new();
        for (line_no, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            diag.lines_read += 1;
            match self.parser.parse_line(line) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    diag.lines_discarded += 1;
                    log::debug!("[{}] line {} discarded: {}", category, line_no + 1, e);
                }
            }
        }

        let report = self.sanitizer.sanitize(&mut records);
        diag.ep_totals_coerced += report.coerced_ep_totals;
        diag.fields_dropped += report.dropped_fields;

        let rows: Vec<FeatureRow> = records
            .into_iter()
            .map(|mut record| {
                record.category = category.to_string();
                self.engine.derive(record, self.groups, diag)
            })
            .collect();

        Dataset::new(category, rows)
    }

    /// Concatenate datasets in the order given. Rows with the same title in
    /// different categories are all kept.
    pub fn merge<I>(name: &str, datasets: I) -> Dataset
    where
        I: IntoIterator<Item = Dataset>,
    {
        let rows: Vec<FeatureRow> = datasets.into_iter().flat_map(|d| d.rows).collect();
        Dataset::new(name, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureConfig;
    use crate::services::{ExternalLookup, SPACING_FALLBACK};
    use serde_json::json;

    const GOOD: &str = r#"{"Show": {"ep_total": "10", "first_release": "2022-12-01", "description": "dup", "recent_eps": [["2023-01-10", "00:30:00", 5], ["2023-01-01", "00:28:00", 2]], "ch_feed-socials": ["http://example.com", "http://twitter.com/x"]}}"#;
    const PYTHON: &str = "{'Old Show': {'ep_total': 4.0, 'recent_eps': [], 'ch_feed-socials': []}}";

    fn engine() -> FeatureEngine {
        FeatureEngine::new(&FeatureConfig::default(), ExternalLookup::empty()).unwrap()
    }

    #[test]
    fn test_build_category() {
        let engine = engine();
        let sanitizer = Sanitizer::default();
        let builder = DatasetBuilder::new(&sanitizer, &engine, FeatureGroups::all());
        let mut diag = Diagnostics::new();

        let lines = vec![GOOD, "", "{broken", PYTHON, "[]"];
        let dataset = builder.build_category("comedy", lines, &mut diag);

        assert_eq!(dataset.name, "comedy");
        assert_eq!(dataset.count, 2);
        assert_eq!(diag.lines_read, 4);
        assert_eq!(diag.lines_discarded, 2);
        assert_eq!(diag.ep_totals_coerced, 2);
        assert_eq!(diag.fields_dropped, 1);

        let show = &dataset.rows[0];
        assert_eq!(show.record.category, "comedy");
        assert_eq!(show.record.ep_total, json!(10));
        assert!(!show.record.extra.contains_key("description"));
        let episode = show.episode.unwrap();
        assert_eq!(episode.lifetime_ep_freq, 0.25);
        let social = show.social.as_ref().unwrap();
        assert_eq!(social.has("twitter"), Some(1));
        assert_eq!(social.external_domain.as_deref(), Some("example.com"));

        let old = &dataset.rows[1];
        assert_eq!(old.record.title, "Old Show");
        assert_eq!(old.record.ep_total, json!(4));
        assert_eq!(old.episode.unwrap().recent_ep_spacing, SPACING_FALLBACK);
        assert_eq!(old.social.as_ref().unwrap().external_domain, None);
    }

    #[test]
    fn test_build_single_group() {
        let engine = engine();
        let sanitizer = Sanitizer::default();
        let groups = FeatureGroups {
            episode: false,
            social: true,
        };
        let builder = DatasetBuilder::new(&sanitizer, &engine, groups);
        let dataset = builder.build_category("news", [GOOD], &mut Diagnostics::new());

        assert!(dataset.rows[0].episode.is_none());
        assert!(dataset.rows[0].social.is_some());
    }

    #[test]
    fn test_every_row_has_requested_columns() {
        let engine = engine();
        let sanitizer = Sanitizer::default();
        let builder = DatasetBuilder::new(&sanitizer, &engine, FeatureGroups::all());
        let lines = [
            GOOD,
            PYTHON,
            r#"{"Bare": {}}"#,
            r#"{"Odd": {"ep_total": [1], "recent_eps": [["x", "y", 0]], "first_release": "z"}}"#,
        ];
        let dataset = builder.build_category("misc", lines, &mut Diagnostics::new());

        assert_eq!(dataset.count, 4);
        for row in &dataset.rows {
            let episode = row.episode.expect("episode columns");
            assert!(episode.recent_ep_spacing.is_finite());
            assert!(episode.avg_ep_len.is_finite());
            assert_eq!(row.social.as_ref().expect("social columns").presence.len(), 4);
        }
    }

    #[test]
    fn test_bad_entries_do_not_cost_the_row() {
        let engine = engine();
        let sanitizer = Sanitizer::default();
        let builder = DatasetBuilder::new(&sanitizer, &engine, FeatureGroups::all());
        let lines = [
            r#"{"Nulls": {"ep_total": 10, "first_release": "2022-12-01", "recent_eps": [["2023-01-10", "00:30:00", 5], ["2023-01-01", null, 2]], "ch_feed-socials": [null, "http://twitter.com/x"]}}"#,
            r#"{"Short": {"ep_total": 10, "first_release": "2022-12-01", "recent_eps": [["2023-01-10", "00:30:00", 5], ["2023-01-01", "00:28:00"]], "sub_count": "1,234"}}"#,
        ];
        let mut diag = Diagnostics::new();
        let dataset = builder.build_category("comedy", lines, &mut diag);

        assert_eq!(dataset.count, 2);
        assert_eq!(diag.lines_discarded, 0);

        let nulls = &dataset.rows[0];
        let episode = nulls.episode.unwrap();
        assert_eq!(episode.chan_age, 40.0);
        assert_eq!(episode.recent_ep_spacing, 9.0);
        // Only the entry with a readable duration is averaged
        assert_eq!(episode.avg_ep_len, 1800.0);
        assert_eq!(nulls.social.as_ref().unwrap().has("twitter"), Some(1));

        let short = &dataset.rows[1];
        let episode = short.episode.unwrap();
        assert_eq!(episode.chan_age, 40.0);
        assert_eq!(episode.recent_ep_spacing, 9.0);
        assert_eq!(episode.avg_ep_len, 1740.0);
        assert_eq!(short.record.sub_count, Some(1234));
        assert_eq!(short.social.as_ref().unwrap().presence.len(), 4);
    }

    #[test]
    fn test_merge_keeps_duplicates_across_categories() {
        let engine = engine();
        let sanitizer = Sanitizer::default();
        let builder = DatasetBuilder::new(&sanitizer, &engine, FeatureGroups::all());
        let mut diag = Diagnostics::new();

        let comedy = builder.build_category("comedy", [GOOD, PYTHON], &mut diag);
        let news = builder.build_category("news", [GOOD], &mut diag);
        let merged = DatasetBuilder::merge("all", vec![comedy, news]);

        assert_eq!(merged.name, "all");
        assert_eq!(merged.count, 3);
        let keys: Vec<(&str, &str)> = merged.rows.iter().map(FeatureRow::key).collect();
        assert_eq!(
            keys,
            vec![("Show", "comedy"), ("Old Show", "comedy"), ("Show", "news")]
        );
    }
}
