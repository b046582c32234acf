//! podfeat CLI
//!
//! Local execution entry point for building feature datasets.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use podcast_features::{
    error::Result,
    models::{Config, FeatureGroup, FeatureGroups},
    pipeline,
    services::ExternalLookup,
    storage::{DatasetStorage, LocalStorage},
};

/// podfeat - Podcast Feature Builder
#[derive(Parser, Debug)]
#[command(
    name = "podfeat",
    version,
    about = "Builds feature datasets from scraped podcast directories"
)]
struct Cli {
    /// Path to storage directory containing config, raw scrapes and lookups
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build category datasets and the merged dataset
    Build {
        /// Category to build (repeatable; default: every raw file)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Feature groups to derive (default: from config)
        #[arg(short, long, value_enum, value_delimiter = ',')]
        groups: Vec<FeatureGroup>,
    },

    /// Re-merge existing category datasets
    Merge,

    /// Validate configuration and lookup tables
    Validate,

    /// Show raw categories and built datasets
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    log::info!("Loaded configuration from {}", cli.storage_dir.display());

    let storage = LocalStorage::with_paths(&cli.storage_dir, &config.paths);

    match cli.command {
        Command::Build { categories, groups } => {
            config.validate()?;
            let groups = if groups.is_empty() {
                config.features.default_groups()
            } else {
                groups.into_iter().collect::<FeatureGroups>()
            };

            let lookup = pipeline::load_lookup(&config, &storage, groups);
            let report = pipeline::run_build(&config, &storage, lookup, &categories, groups)?;
            if !report.diagnostics.failures.is_empty() {
                log::info!(
                    "{} feature fallbacks recorded in report.json",
                    report.diagnostics.failures.len()
                );
            }
        }

        Command::Merge => {
            pipeline::run_merge(&config, &storage)?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let lookup = ExternalLookup::load(
                &storage.path(&config.paths.followers_file),
                &storage.path(&config.paths.domains_file),
            );
            match lookup {
                Ok(lookup) => log::info!(
                    "✓ Lookup tables OK ({} follower entries)",
                    lookup.follower_entries()
                ),
                Err(e) => {
                    log::error!("Lookup validation failed: {}", e);
                    return Err(e);
                }
            }

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            let categories = storage.list_categories()?;
            if categories.is_empty() {
                log::info!("No raw categories found.");
            } else {
                log::info!("Raw categories: {}", categories.join(", "));
            }

            let datasets = storage.list_datasets()?;
            if datasets.is_empty() {
                log::info!("No datasets built yet.");
            }
            for name in &datasets {
                if let Some(dataset) = storage.load_dataset(name)? {
                    log::info!(
                        "  {}: {} rows (built {})",
                        name,
                        dataset.count,
                        dataset.built_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
