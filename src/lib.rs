// src/lib.rs

//! Podcast feature datasets
//!
//! Turns raw podcast-directory scrapes into per-category feature datasets:
//! records are parsed, sanitized, labeled with their category and enriched
//! with episode and social features before being written and merged.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
