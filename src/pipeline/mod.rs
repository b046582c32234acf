//! Pipeline entry points.
//!
//! - `DatasetBuilder`: parse, sanitize and derive features for one category
//! - `run_build`: build every category, write datasets, merge, report
//! - `run_merge`: merge previously written category datasets

mod build;
mod run;

pub use build::DatasetBuilder;
pub use run::{load_lookup, run_build, run_merge};
