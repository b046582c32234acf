//! Storage abstractions for raw scrapes and feature datasets.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml           # Pipeline configuration
//! ├── report.json           # Diagnostics of the last build
//! ├── raw/                  # Scraper output, one file per category
//! │   ├── comedy.txt
//! │   └── news.txt
//! ├── lookup/               # Side tables, loaded once per run
//! │   ├── followers.json
//! │   └── domains.json
//! └── datasets/             # Built feature datasets
//!     ├── comedy.json
//!     ├── news.json
//!     └── all.json          # Merged across categories
//! ```

pub mod local;

use crate::error::Result;
use crate::models::{Dataset, RunReport};

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about a dataset write.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Number of rows written
    pub row_count: usize,
    /// Where the dataset landed
    pub location: String,
}

/// Trait for dataset storage backends.
pub trait DatasetStorage {
    /// Categories that have a raw scrape file, sorted.
    fn list_categories(&self) -> Result<Vec<String>>;

    /// All lines of a category's raw scrape file.
    fn read_raw_lines(&self, category: &str) -> Result<Vec<String>>;

    /// Write a dataset wholesale, replacing any previous one of the same name.
    fn write_dataset(&self, dataset: &Dataset) -> Result<WriteMetadata>;

    /// Load a previously written dataset.
    fn load_dataset(&self, name: &str) -> Result<Option<Dataset>>;

    /// Names of written datasets, sorted.
    fn list_datasets(&self) -> Result<Vec<String>>;

    /// Write the report of a build run.
    fn write_report(&self, report: &RunReport) -> Result<()>;
}
