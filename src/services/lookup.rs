// src/services/lookup.rs

//! Precomputed side tables: follower metrics by channel title and
//! classification by external host.
//!
//! Both are loaded once per run and handed to the feature engine; nothing
//! refreshes them while a build is in progress.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::fs::load_json;

/// Social metrics collected for one channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowerMetrics {
    pub follower_count: u64,

    /// Anything else the collector stored (handle, friend count, ...)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Read-only lookup tables.
#[derive(Debug, Clone, Default)]
pub struct ExternalLookup {
    followers: HashMap<String, FollowerMetrics>,
    domains: HashMap<String, String>,
}

impl ExternalLookup {
    /// No tables: every title has 0 followers, every host is unclassified.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from in-memory tables.
    pub fn from_tables(
        followers: HashMap<String, FollowerMetrics>,
        domains: HashMap<String, String>,
    ) -> Self {
        let domains = domains
            .into_iter()
            .map(|(host, class)| (host.to_lowercase(), class))
            .collect();
        Self { followers, domains }
    }

    /// Load both tables from JSON files.
    pub fn load(followers_path: &Path, domains_path: &Path) -> Result<Self> {
        let followers: HashMap<String, FollowerMetrics> = load_json(followers_path)?;
        let domains: HashMap<String, String> = load_json(domains_path)?;
        log::info!(
            "Loaded {} follower entries and {} domain classes",
            followers.len(),
            domains.len()
        );
        Ok(Self::from_tables(followers, domains))
    }

    /// Load both tables, treating a missing or unreadable file as an empty table.
    pub fn load_or_empty(followers_path: &Path, domains_path: &Path) -> Self {
        let followers = load_json(followers_path).unwrap_or_else(|e| {
            log::warn!(
                "Follower table load failed from {:?}: {}. Counts default to 0.",
                followers_path,
                e
            );
            HashMap::new()
        });
        let domains = load_json(domains_path).unwrap_or_else(|e| {
            log::warn!(
                "Domain table load failed from {:?}: {}. Domains stay unclassified.",
                domains_path,
                e
            );
            HashMap::new()
        });
        Self::from_tables(followers, domains)
    }

    /// Follower count for a channel title, 0 when the title is not listed.
    pub fn follower_count(&self, title: &str) -> u64 {
        self.followers
            .get(title)
            .map(|m| m.follower_count)
            .unwrap_or(0)
    }

    /// Classification for a host, if the table has one.
    pub fn domain_class(&self, host: &str) -> Option<&str> {
        self.domains.get(&host.to_lowercase()).map(String::as_str)
    }

    pub fn follower_entries(&self) -> usize {
        self.followers.len()
    }
}
