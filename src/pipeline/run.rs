// src/pipeline/run.rs

//! Build and merge runs over a storage directory.

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{
    CategorySummary, Config, Diagnostics, FeatureGroup, FeatureGroups, RunReport,
};
use crate::pipeline::DatasetBuilder;
use crate::services::{ExternalLookup, FeatureEngine, Sanitizer};
use crate::storage::{DatasetStorage, LocalStorage};
use crate::utils::fs::check_stem;
use crate::utils::progress;

/// Load the side tables when the social group needs them.
pub fn load_lookup(config: &Config, storage: &LocalStorage, groups: FeatureGroups) -> ExternalLookup {
    if !groups.social {
        return ExternalLookup::empty();
    }
    ExternalLookup::load_or_empty(
        &storage.path(&config.paths.followers_file),
        &storage.path(&config.paths.domains_file),
    )
}

/// Build the requested categories (all raw files when empty), write each
/// dataset as soon as it is built, then write the merged dataset and report.
pub fn run_build(
    config: &Config,
    storage: &dyn DatasetStorage,
    lookup: ExternalLookup,
    categories: &[String],
    groups: FeatureGroups,
) -> Result<RunReport> {
    let started_at = Utc::now();
    if groups.is_empty() {
        return Err(AppError::validation("no feature groups selected"));
    }

    let categories = if categories.is_empty() {
        storage.list_categories()?
    } else {
        categories.to_vec()
    };
    if categories.is_empty() {
        return Err(AppError::config("no raw category files found"));
    }
    for category in &categories {
        check_stem("category", category)?;
    }
    if categories.iter().any(|c| *c == config.paths.merged_name) {
        return Err(AppError::config(format!(
            "category name collides with merged dataset '{}'",
            config.paths.merged_name
        )));
    }

    progress::header(&format!(
        "Building {} categories ({})",
        categories.len(),
        group_names(groups).join(", ")
    ));

    let engine = FeatureEngine::new(&config.features, lookup)?;
    let sanitizer = Sanitizer::new(&config.sanitize);
    let builder = DatasetBuilder::new(&sanitizer, &engine, groups);

    let mut diagnostics = Diagnostics::new();
    let mut summaries = Vec::new();
    let mut datasets = Vec::new();

    for (i, category) in categories.iter().enumerate() {
        if config.logging.show_progress {
            progress::step(i + 1, categories.len(), category);
        }
        let lines = storage.read_raw_lines(category)?;

        let mut diag = Diagnostics::new();
        let dataset = builder.build_category(category, &lines, &mut diag);
        let meta = storage.write_dataset(&dataset)?;

        if config.logging.show_progress {
            progress::sub_item(&format!(
                "{} rows → {} ({} lines discarded, {} fallbacks)",
                meta.row_count,
                meta.location,
                diag.lines_discarded,
                diag.failures.len()
            ));
        }

        summaries.push(CategorySummary {
            name: category.clone(),
            rows: dataset.count,
            lines_discarded: diag.lines_discarded,
            fallbacks: diag.failures.len(),
        });
        diagnostics.absorb(diag);
        datasets.push(dataset);
    }

    let merged = DatasetBuilder::merge(&config.paths.merged_name, datasets);
    let meta = storage.write_dataset(&merged)?;

    let report = RunReport {
        started_at,
        finished_at: Utc::now(),
        groups: group_names(groups),
        categories: summaries,
        merged_rows: merged.count,
        diagnostics,
    };
    storage.write_report(&report)?;

    let counts = report.diagnostics.failure_counts();
    let mut items = vec![
        ("Categories", report.categories.len().to_string()),
        ("Rows", report.merged_rows.to_string()),
        ("Merged dataset", meta.location),
        ("Lines discarded", report.diagnostics.lines_discarded.to_string()),
        ("ep_total coerced", report.diagnostics.ep_totals_coerced.to_string()),
    ];
    for (column, count) in &counts {
        items.push((column.as_str(), count.to_string()));
    }
    progress::summary("Build complete", &items);

    Ok(report)
}

/// Re-merge previously written category datasets without rebuilding them.
pub fn run_merge(config: &Config, storage: &dyn DatasetStorage) -> Result<usize> {
    let merged_name = &config.paths.merged_name;
    let names: Vec<String> = storage
        .list_datasets()?
        .into_iter()
        .filter(|name| name != merged_name)
        .collect();
    if names.is_empty() {
        return Err(AppError::config("no category datasets to merge; run build first"));
    }

    progress::header(&format!("Merging {} datasets", names.len()));
    let mut datasets = Vec::new();
    for name in &names {
        if let Some(dataset) = storage.load_dataset(name)? {
            progress::sub_item(&format!("{}: {} rows", name, dataset.count));
            datasets.push(dataset);
        }
    }

    let merged = DatasetBuilder::merge(merged_name, datasets);
    let meta = storage.write_dataset(&merged)?;
    log::info!("{} rows merged into {}", meta.row_count, meta.location);
    Ok(meta.row_count)
}

fn group_names(groups: FeatureGroups) -> Vec<String> {
    [FeatureGroup::Episode, FeatureGroup::Social]
        .into_iter()
        .filter(|group| groups.contains(*group))
        .map(|group| group.to_string())
        .collect()
}
