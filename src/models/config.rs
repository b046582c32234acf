//! Application configuration structures.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{FeatureGroup, FeatureGroups};
use crate::error::{AppError, Result};
use crate::utils::fs::{check_stem, load_toml};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Storage layout, relative to the storage directory
    #[serde(default)]
    pub paths: PathsConfig,

    /// Feature groups and their parameters
    #[serde(default)]
    pub features: FeatureConfig,

    /// Record cleanup rules
    #[serde(default)]
    pub sanitize: SanitizeConfig,

    /// Output verbosity
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_toml(path.as_ref())
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.features.groups.is_empty() {
            return Err(AppError::validation("features.groups is empty"));
        }
        if self.features.social_domains.is_empty() {
            return Err(AppError::validation("features.social_domains is empty"));
        }
        if self
            .features
            .social_domains
            .iter()
            .any(|d| d.trim().is_empty())
        {
            return Err(AppError::validation(
                "features.social_domains contains an empty domain",
            ));
        }
        if !self.features.spacing_fallback.is_finite() {
            return Err(AppError::validation(
                "features.spacing_fallback must be finite",
            ));
        }
        check_stem("paths.merged_name", &self.paths.merged_name)
    }
}

/// Where inputs and outputs live under the storage directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory of raw `<category>.txt` scrape files
    #[serde(default = "defaults::raw_dir")]
    pub raw_dir: String,

    /// Directory of `<category>.json` datasets
    #[serde(default = "defaults::dataset_dir")]
    pub dataset_dir: String,

    /// Title → follower metrics table
    #[serde(default = "defaults::followers_file")]
    pub followers_file: String,

    /// Host → classification table
    #[serde(default = "defaults::domains_file")]
    pub domains_file: String,

    /// Name of the merged all-category dataset
    #[serde(default = "defaults::merged_name")]
    pub merged_name: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_dir: defaults::raw_dir(),
            dataset_dir: defaults::dataset_dir(),
            followers_file: defaults::followers_file(),
            domains_file: defaults::domains_file(),
            merged_name: defaults::merged_name(),
        }
    }
}

/// Feature settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Groups computed when the caller does not pick any
    #[serde(default = "defaults::groups")]
    pub groups: Vec<FeatureGroup>,

    /// Social networks checked for `has_<domain>` flags
    #[serde(default = "defaults::social_domains")]
    pub social_domains: Vec<String>,

    /// `recent_ep_spacing` when it cannot be computed
    #[serde(default = "defaults::spacing_fallback")]
    pub spacing_fallback: f64,
}

impl FeatureConfig {
    pub fn default_groups(&self) -> FeatureGroups {
        self.groups.iter().copied().collect()
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            groups: defaults::groups(),
            social_domains: defaults::social_domains(),
            spacing_fallback: defaults::spacing_fallback(),
        }
    }
}

/// Record cleanup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizeConfig {
    /// Attributes removed from every record
    #[serde(default = "defaults::drop_fields")]
    pub drop_fields: Vec<String>,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            drop_fields: defaults::drop_fields(),
        }
    }
}

/// Output verbosity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log per-category progress lines
    #[serde(default = "defaults::show_progress")]
    pub show_progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            show_progress: defaults::show_progress(),
        }
    }
}

mod defaults {
    use super::FeatureGroup;

    // Path defaults
    pub fn raw_dir() -> String {
        "raw".into()
    }
    pub fn dataset_dir() -> String {
        "datasets".into()
    }
    pub fn followers_file() -> String {
        "lookup/followers.json".into()
    }
    pub fn domains_file() -> String {
        "lookup/domains.json".into()
    }
    pub fn merged_name() -> String {
        "all".into()
    }

    // Feature defaults
    pub fn groups() -> Vec<FeatureGroup> {
        vec![FeatureGroup::Episode, FeatureGroup::Social]
    }
    pub fn social_domains() -> Vec<String> {
        vec![
            "twitter".into(),
            "facebook".into(),
            "youtube".into(),
            "instagram".into(),
        ]
    }
    pub fn spacing_fallback() -> f64 {
        914.3
    }

    // Sanitize defaults
    pub fn drop_fields() -> Vec<String> {
        vec!["description".into()]
    }

    // Logging defaults
    pub fn show_progress() -> bool {
        true
    }
}
