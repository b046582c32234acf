//! Channel record scraped from a podcast directory page.
//!
//! Scraped attributes are read leniently: a field holding the wrong kind of
//! value is treated as absent, and one malformed episode or link never costs
//! the whole record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of recent-episode metadata.
///
/// Stored on disk as a `[date, duration, favorites]` triple, the way the
/// scraper emits it. Any shape is accepted on read; missing or non-text parts
/// become empty strings and fail later, when a feature parses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "(String, String, i64)")]
pub struct EpisodeEntry {
    /// Release date, `YYYY-MM-DD`
    pub date: String,
    /// Running time, `HH:MM:SS`
    pub duration: String,
    /// Favorite count shown next to the episode, 0 when unreadable
    pub favorites: i64,
}

impl EpisodeEntry {
    pub fn new(date: impl Into<String>, duration: impl Into<String>, favorites: i64) -> Self {
        Self {
            date: date.into(),
            duration: duration.into(),
            favorites,
        }
    }
}

impl From<Value> for EpisodeEntry {
    fn from(value: Value) -> Self {
        let items = match value {
            Value::Array(items) => items,
            other => vec![other],
        };
        let text = |i: usize| match items.get(i) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };
        let favorites = items
            .get(2)
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .unwrap_or(0);

        Self {
            date: text(0),
            duration: text(1),
            favorites,
        }
    }
}

impl From<EpisodeEntry> for (String, String, i64) {
    fn from(entry: EpisodeEntry) -> Self {
        (entry.date, entry.duration, entry.favorites)
    }
}

/// One podcast channel's scraped snapshot.
///
/// Fields the feature functions read are typed. Anything else the scraper
/// captured (author, cover image, descriptions, ...) is kept verbatim in
/// `extra` so it survives into the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Channel title, unique within a category
    pub title: String,

    /// Category label, attached by the dataset builder
    #[serde(default)]
    pub category: String,

    /// Date of the first episode, `YYYY-MM-DD`
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_release: Option<String>,

    /// Episode count; raw scrapes sometimes stored it as a string or float
    #[serde(default)]
    pub ep_total: Value,

    /// Recent episodes, most recent first
    #[serde(
        default,
        deserialize_with = "lenient::entries",
        skip_serializing_if = "Option::is_none"
    )]
    pub recent_eps: Option<Vec<EpisodeEntry>>,

    /// Social feeds and website links listed on the channel page
    #[serde(
        default,
        alias = "ch_feed-socials",
        deserialize_with = "lenient::links",
        skip_serializing_if = "Option::is_none"
    )]
    pub social_links: Option<Vec<String>>,

    #[serde(
        default,
        deserialize_with = "lenient::count",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_count: Option<u64>,

    #[serde(
        default,
        deserialize_with = "lenient::count",
        skip_serializing_if = "Option::is_none"
    )]
    pub play_count: Option<u64>,

    /// Remaining scraped attributes
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ChannelRecord {
    /// Create an empty record with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: String::new(),
            first_release: None,
            ep_total: Value::Null,
            recent_eps: None,
            social_links: None,
            sub_count: None,
            play_count: None,
            extra: BTreeMap::new(),
        }
    }

    /// Most recent episode, if any.
    pub fn latest_episode(&self) -> Option<&EpisodeEntry> {
        self.recent_eps.as_deref().and_then(<[EpisodeEntry]>::first)
    }
}

/// Field deserializers that map unexpected shapes to `None`.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::EpisodeEntry;

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => Some(s),
            _ => None,
        })
    }

    pub fn entries<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Vec<EpisodeEntry>>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => Some(items.into_iter().map(EpisodeEntry::from).collect()),
            _ => None,
        })
    }

    /// Non-text links (anchors without an href) are dropped.
    pub fn links<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(link) => Some(link),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        })
    }

    /// Counts as shown on the page: `1234`, `1234.0` or `"1,234"`.
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            }),
            Some(Value::String(s)) => s.trim().replace(',', "").parse().ok(),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_scraper_shape() {
        let record: ChannelRecord = serde_json::from_value(json!({
            "title": "Show",
            "ep_total": "12",
            "recent_eps": [["2023-01-10", "00:30:00", 5]],
            "ch_feed-socials": ["http://twitter.com/show"],
            "author": "Someone",
            "isExplicit": 0
        }))
        .unwrap();

        assert_eq!(record.ep_total, json!("12"));
        assert_eq!(
            record.latest_episode(),
            Some(&EpisodeEntry::new("2023-01-10", "00:30:00", 5))
        );
        assert_eq!(
            record.social_links,
            Some(vec!["http://twitter.com/show".to_string()])
        );
        assert_eq!(record.extra.get("author"), Some(&json!("Someone")));
        assert_eq!(record.extra.get("isExplicit"), Some(&json!(0)));
        assert_eq!(record.category, "");
    }

    #[test]
    fn test_episode_serializes_as_triple() {
        let value = serde_json::to_value(EpisodeEntry::new("2023-01-01", "00:28:00", 2)).unwrap();
        assert_eq!(value, json!(["2023-01-01", "00:28:00", 2]));
    }

    #[test]
    fn test_malformed_episode_entries_are_kept() {
        let record: ChannelRecord = serde_json::from_value(json!({
            "title": "Show",
            "recent_eps": [
                ["2023-01-10", "00:30:00", 5],
                ["2023-01-01", null, 2],
                ["2022-12-20", "00:20:00"],
                ["2022-12-10", "00:25:00", "many"],
                "2022-12-01"
            ]
        }))
        .unwrap();

        let eps = record.recent_eps.unwrap();
        assert_eq!(eps.len(), 5);
        assert_eq!(eps[1], EpisodeEntry::new("2023-01-01", "", 2));
        assert_eq!(eps[2], EpisodeEntry::new("2022-12-20", "00:20:00", 0));
        assert_eq!(eps[3].favorites, 0);
        assert_eq!(eps[4], EpisodeEntry::new("2022-12-01", "", 0));
    }

    #[test]
    fn test_non_text_links_are_dropped() {
        let record: ChannelRecord = serde_json::from_value(json!({
            "title": "Show",
            "ch_feed-socials": [null, "http://twitter.com/x", 3]
        }))
        .unwrap();
        assert_eq!(
            record.social_links,
            Some(vec!["http://twitter.com/x".to_string()])
        );
    }

    #[test]
    fn test_wrongly_typed_fields_read_as_absent() {
        let record: ChannelRecord = serde_json::from_value(json!({
            "title": "Show",
            "first_release": 2022,
            "recent_eps": "soon",
            "ch_feed-socials": "http://twitter.com/x",
            "sub_count": "1,234",
            "play_count": "lots"
        }))
        .unwrap();

        assert_eq!(record.first_release, None);
        assert_eq!(record.recent_eps, None);
        assert_eq!(record.social_links, None);
        assert_eq!(record.sub_count, Some(1234));
        assert_eq!(record.play_count, None);
    }

    #[test]
    fn test_missing_lists_stay_absent() {
        let record: ChannelRecord = serde_json::from_value(json!({"title": "Bare"})).unwrap();
        assert!(record.recent_eps.is_none());
        assert!(record.social_links.is_none());
        assert!(record.latest_episode().is_none());

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("recent_eps").is_none());
        assert!(value.get("social_links").is_none());
    }
}
