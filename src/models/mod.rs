// src/models/mod.rs

//! Domain models for the feature pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod channel;
mod config;
mod dataset;
mod diagnostics;
mod feature;

// Re-export all public types
pub use channel::{ChannelRecord, EpisodeEntry};
pub use config::{Config, FeatureConfig, LoggingConfig, PathsConfig, SanitizeConfig};
pub use dataset::{CategorySummary, Dataset, RunReport};
pub use diagnostics::{Diagnostics, FeatureFailure};
pub use feature::{
    EpisodeFeatures, FeatureGroup, FeatureGroups, FeatureRow, SocialFeatures, presence_column,
};
