//! Derived feature columns.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ChannelRecord;

/// A named subset of feature columns that can be computed on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FeatureGroup {
    /// Cadence, length and age features from the episode history
    Episode,
    /// Social presence flags, follower counts and external site
    Social,
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureGroup::Episode => f.write_str("episode"),
            FeatureGroup::Social => f.write_str("social"),
        }
    }
}

/// Which feature groups a build computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureGroups {
    pub episode: bool,
    pub social: bool,
}

impl FeatureGroups {
    /// Both groups.
    pub fn all() -> Self {
        Self {
            episode: true,
            social: true,
        }
    }

    pub fn contains(&self, group: FeatureGroup) -> bool {
        match group {
            FeatureGroup::Episode => self.episode,
            FeatureGroup::Social => self.social,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.episode && !self.social
    }
}

impl FromIterator<FeatureGroup> for FeatureGroups {
    fn from_iter<I: IntoIterator<Item = FeatureGroup>>(iter: I) -> Self {
        let mut groups = Self::default();
        for group in iter {
            match group {
                FeatureGroup::Episode => groups.episode = true,
                FeatureGroup::Social => groups.social = true,
            }
        }
        groups
    }
}

/// Temporal and structural features from the episode history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeFeatures {
    /// Mean days between consecutive recent episodes
    pub recent_ep_spacing: f64,
    /// Episodes per day over the channel's active life
    pub lifetime_ep_freq: f64,
    /// Days from first release to latest episode
    pub chan_age: f64,
    /// Mean running time of recent episodes, in seconds
    pub avg_ep_len: f64,
}

/// Social presence and external-site features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialFeatures {
    /// `has_<domain>` → 0/1, one entry per configured social domain
    pub presence: BTreeMap<String, u8>,
    /// Follower count from the side table, 0 when the channel is not listed
    pub twitter_followers: u64,
    /// Host of the last non-social link, `None` when there is none
    pub external_domain: Option<String>,
    /// Classification of `external_domain` from the domain table
    pub external_domain_class: Option<String>,
}

impl SocialFeatures {
    /// Presence flag for one domain, e.g. `has("twitter")`.
    pub fn has(&self, domain: &str) -> Option<u8> {
        self.presence.get(&presence_column(domain)).copied()
    }
}

/// Column name of a social presence flag.
pub fn presence_column(domain: &str) -> String {
    format!("has_{domain}")
}

/// A channel record with its derived columns.
///
/// A group's columns are present on every row whenever that group was
/// requested for the build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub record: ChannelRecord,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeFeatures>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialFeatures>,
}

impl FeatureRow {
    /// Row without any derived columns yet.
    pub fn new(record: ChannelRecord) -> Self {
        Self {
            record,
            episode: None,
            social: None,
        }
    }

    /// Practical identity of a row across categories.
    pub fn key(&self) -> (&str, &str) {
        (&self.record.title, &self.record.category)
    }
}
