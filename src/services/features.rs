// src/services/features.rs

//! Feature derivation.
//!
//! Each feature is a pure function returning `Result<_, FeatureError>`.
//! [`FeatureEngine`] calls them per record and replaces every error with the
//! column's fallback, logging the reason into [`Diagnostics`]. Fallbacks:
//!
//! | column                  | fallback              |
//! |-------------------------|-----------------------|
//! | `recent_ep_spacing`     | 914.3 (configurable)  |
//! | `lifetime_ep_freq`      | 0                     |
//! | `chan_age`              | 0                     |
//! | `avg_ep_len`            | 0                     |
//! | `has_<domain>`          | 0                     |
//! | `twitter_followers`     | 0                     |
//! | `external_domain`       | none                  |

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{FeatureError, Result};
use crate::models::{
    ChannelRecord, Diagnostics, EpisodeEntry, EpisodeFeatures, FeatureConfig, FeatureGroups,
    FeatureRow, SocialFeatures, presence_column,
};
use crate::services::ExternalLookup;
use crate::utils::dates::{days_between, parse_duration_secs, parse_ep_date};
use crate::utils::url::display_domain;

/// Prior used for `recent_ep_spacing` when it cannot be computed.
pub const SPACING_FALLBACK: f64 = 914.3;

/// Mean days between consecutive entries, in the order given.
pub fn recent_ep_spacing(eps: &[EpisodeEntry]) -> std::result::Result<f64, FeatureError> {
    if eps.len() < 2 {
        return Err(FeatureError::NotEnoughEpisodes {
            needed: 2,
            found: eps.len(),
        });
    }
    let dates = eps
        .iter()
        .map(|ep| parse_ep_date(&ep.date))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let gaps: Vec<f64> = dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days().abs() as f64)
        .collect();
    Ok(mean(&gaps))
}

/// Days between the first release and the most recent episode.
pub fn chan_age(record: &ChannelRecord) -> std::result::Result<f64, FeatureError> {
    if record.recent_eps.is_none() {
        return Err(FeatureError::MissingField("recent_eps"));
    }
    let latest = record
        .latest_episode()
        .ok_or(FeatureError::NotEnoughEpisodes {
            needed: 1,
            found: 0,
        })?;
    let release = record
        .first_release
        .as_deref()
        .ok_or(FeatureError::MissingField("first_release"))?;

    let days = days_between(parse_ep_date(release)?, parse_ep_date(&latest.date)?);
    if days < 0.0 {
        return Err(FeatureError::NegativeAge { days: -days });
    }
    Ok(days)
}

/// Episodes per day over the channel's active life; 0 for a zero-day life.
pub fn lifetime_ep_freq(record: &ChannelRecord) -> std::result::Result<f64, FeatureError> {
    let age = chan_age(record)?;
    let ep_total = record
        .ep_total
        .as_f64()
        .ok_or_else(|| FeatureError::NotNumeric {
            field: "ep_total",
            value: record.ep_total.to_string(),
        })?;

    if age == 0.0 {
        Ok(0.0)
    } else {
        Ok(ep_total / age)
    }
}

/// Mean running time in seconds over the entries whose duration parses.
///
/// Unparsable entries are skipped; it only fails when none parse.
pub fn avg_ep_len(eps: &[EpisodeEntry]) -> std::result::Result<f64, FeatureError> {
    let lengths: Vec<f64> = eps
        .iter()
        .filter_map(|ep| match parse_duration_secs(&ep.duration) {
            Ok(secs) => Some(f64::from(secs)),
            Err(e) => {
                log::debug!("skipping episode {}: {}", ep.date, e);
                None
            }
        })
        .collect();

    if lengths.is_empty() {
        return Err(FeatureError::NoParsableDurations { total: eps.len() });
    }
    Ok(mean(&lengths))
}

/// 1 if any link matches the domain pattern, else 0.
pub fn has_domain(links: &[String], pattern: &Regex) -> u8 {
    u8::from(links.iter().any(|link| pattern.is_match(link)))
}

/// Last link that matches none of the social patterns.
pub fn last_external_link<'a>(links: &'a [String], social: &[Regex]) -> Option<&'a str> {
    links
        .iter()
        .rev()
        .find(|link| !social.iter().any(|p| p.is_match(link)))
        .map(String::as_str)
}

/// Permissive presence pattern: the domain token anywhere in the link.
pub fn domain_pattern(domain: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(".*{}.*", regex::escape(domain)))?)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes feature groups for records, substituting fallbacks on failure.
#[derive(Debug, Clone)]
pub struct FeatureEngine {
    /// `has_<domain>` column names, parallel to `patterns`
    columns: Vec<String>,
    patterns: Vec<Regex>,
    lookup: ExternalLookup,
    spacing_fallback: f64,
}

impl FeatureEngine {
    /// Compile the social patterns and take ownership of the lookup tables.
    pub fn new(config: &FeatureConfig, lookup: ExternalLookup) -> Result<Self> {
        let patterns = config
            .social_domains
            .iter()
            .map(|domain| domain_pattern(domain))
            .collect::<Result<Vec<_>>>()?;
        let columns = config
            .social_domains
            .iter()
            .map(|domain| presence_column(domain))
            .collect();

        Ok(Self {
            columns,
            patterns,
            lookup,
            spacing_fallback: config.spacing_fallback,
        })
    }

    /// Attach the requested groups' columns to a record.
    pub fn derive(
        &self,
        record: ChannelRecord,
        groups: FeatureGroups,
        diag: &mut Diagnostics,
    ) -> FeatureRow {
        let mut row = FeatureRow::new(record);
        if groups.episode {
            row.episode = Some(self.episode_features(&row.record, diag));
        }
        if groups.social {
            row.social = Some(self.social_features(&row.record, diag));
        }
        row
    }

    /// Cadence, age and length columns.
    pub fn episode_features(
        &self,
        record: &ChannelRecord,
        diag: &mut Diagnostics,
    ) -> EpisodeFeatures {
        let eps = record
            .recent_eps
            .as_deref()
            .ok_or(FeatureError::MissingField("recent_eps"));

        let recent_ep_spacing = settle(
            eps.clone().and_then(recent_ep_spacing),
            self.spacing_fallback,
            "recent_ep_spacing",
            record,
            diag,
        );
        let lifetime_ep_freq = settle(
            lifetime_ep_freq(record),
            0.0,
            "lifetime_ep_freq",
            record,
            diag,
        );
        let chan_age = settle(chan_age(record), 0.0, "chan_age", record, diag);

        let avg_ep_len = match eps.and_then(avg_ep_len) {
            Ok(len) => len,
            Err(e) => {
                log::warn!(
                    "[{}] {}: average episode length unavailable ({})",
                    record.category,
                    record.title,
                    e
                );
                diag.record_failure(&record.title, &record.category, "avg_ep_len", &e);
                0.0
            }
        };

        EpisodeFeatures {
            recent_ep_spacing,
            lifetime_ep_freq,
            chan_age,
            avg_ep_len,
        }
    }

    /// Presence flags, follower count and external site columns.
    pub fn social_features(&self, record: &ChannelRecord, diag: &mut Diagnostics) -> SocialFeatures {
        let links: &[String] = match record.social_links.as_deref() {
            Some(links) => links,
            None => {
                let err = FeatureError::MissingField("social_links");
                for column in &self.columns {
                    diag.record_failure(&record.title, &record.category, column, &err);
                }
                &[]
            }
        };

        let presence: BTreeMap<String, u8> = self
            .columns
            .iter()
            .zip(&self.patterns)
            .map(|(column, pattern)| (column.clone(), has_domain(links, pattern)))
            .collect();

        let external_domain = last_external_link(links, &self.patterns).map(display_domain);
        let external_domain_class = external_domain
            .as_deref()
            .and_then(|host| self.lookup.domain_class(host))
            .map(str::to_string);

        SocialFeatures {
            presence,
            twitter_followers: self.lookup.follower_count(&record.title),
            external_domain,
            external_domain_class,
        }
    }
}

/// Replace a failed computation with its fallback, noting why.
fn settle<T>(
    result: std::result::Result<T, FeatureError>,
    fallback: T,
    column: &str,
    record: &ChannelRecord,
    diag: &mut Diagnostics,
) -> T {
    result.unwrap_or_else(|e| {
        diag.record_failure(&record.title, &record.category, column, &e);
        fallback
    })
}
