//! Local filesystem storage implementation.
//!
//! Raw scrapes are read line by line; datasets are written as pretty JSON,
//! atomically (temp file, then rename), so a crash mid-write never leaves a
//! half-written dataset behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{Dataset, PathsConfig, RunReport};
use crate::storage::{DatasetStorage, WriteMetadata};
use crate::utils::fs::{load_json, save_json};

const RAW_EXTENSION: &str = "txt";
const DATASET_EXTENSION: &str = "json";
const REPORT_FILE: &str = "report.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    raw_dir: PathBuf,
    dataset_dir: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage rooted at the given directory with default layout.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self::with_paths(root_dir, &PathsConfig::default())
    }

    /// Create a LocalStorage using the configured layout.
    pub fn with_paths(root_dir: impl Into<PathBuf>, paths: &PathsConfig) -> Self {
        let root_dir = root_dir.into();
        Self {
            raw_dir: root_dir.join(&paths.raw_dir),
            dataset_dir: root_dir.join(&paths.dataset_dir),
            root_dir,
        }
    }

    /// Resolve a path relative to the storage root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root_dir.join(relative)
    }

    fn raw_path(&self, category: &str) -> PathBuf {
        self.raw_dir.join(format!("{category}.{RAW_EXTENSION}"))
    }

    fn dataset_path(&self, name: &str) -> PathBuf {
        self.dataset_dir.join(format!("{name}.{DATASET_EXTENSION}"))
    }

    /// File stems in `dir` with the given extension, sorted.
    fn stems(dir: &Path, extension: &str) -> Result<Vec<String>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl DatasetStorage for LocalStorage {
    fn list_categories(&self) -> Result<Vec<String>> {
        Self::stems(&self.raw_dir, RAW_EXTENSION)
    }

    fn read_raw_lines(&self, category: &str) -> Result<Vec<String>> {
        let path = self.raw_path(category);
        // Scrapes can contain stray invalid UTF-8; keep the readable lines.
        let bytes = fs::read(&path).map_err(|e| AppError::storage(path.display().to_string(), e))?;
        Ok(String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect())
    }

    fn write_dataset(&self, dataset: &Dataset) -> Result<WriteMetadata> {
        let path = self.dataset_path(&dataset.name);
        save_json(&path, dataset)?;
        log::debug!("{} rows written to {}", dataset.count, path.display());

        Ok(WriteMetadata {
            row_count: dataset.count,
            location: path.display().to_string(),
        })
    }

    fn load_dataset(&self, name: &str) -> Result<Option<Dataset>> {
        let path = self.dataset_path(name);
        if !path.exists() {
            log::warn!("No dataset found at {}", path.display());
            return Ok(None);
        }
        load_json(&path).map(Some)
    }

    fn list_datasets(&self) -> Result<Vec<String>> {
        Self::stems(&self.dataset_dir, DATASET_EXTENSION)
    }

    fn write_report(&self, report: &RunReport) -> Result<()> {
        save_json(&self.root_dir.join(REPORT_FILE), report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelRecord, Diagnostics, FeatureRow};
    use chrono::Utc;
    use tempfile::TempDir;

    fn dataset(name: &str, titles: &[&str]) -> Dataset {
        let rows = titles
            .iter()
            .map(|t| FeatureRow::new(ChannelRecord::new(*t)))
            .collect();
        Dataset::new(name, rows)
    }

    #[test]
    fn test_list_and_read_raw() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        fs::create_dir_all(tmp.path().join("raw")).unwrap();
        fs::write(tmp.path().join("raw/news.txt"), "{\"A\": {}}\n\n{\"B\": {}}\n").unwrap();
        fs::write(tmp.path().join("raw/comedy.txt"), "").unwrap();
        fs::write(tmp.path().join("raw/notes.md"), "ignored").unwrap();

        assert_eq!(storage.list_categories().unwrap(), vec!["comedy", "news"]);
        let lines = storage.read_raw_lines("news").unwrap();
        assert_eq!(lines, vec!["{\"A\": {}}", "", "{\"B\": {}}"]);
    }

    #[test]
    fn test_read_missing_category() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        assert!(matches!(
            storage.read_raw_lines("nope"),
            Err(AppError::Storage { .. })
        ));
        assert!(storage.list_categories().unwrap().is_empty());
    }

    #[test]
    fn test_write_and_load_dataset() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let meta = storage
            .write_dataset(&dataset("comedy", &["A", "B"]))
            .unwrap();
        assert_eq!(meta.row_count, 2);
        assert!(meta.location.ends_with("comedy.json"));

        let loaded = storage.load_dataset("comedy").unwrap().unwrap();
        assert_eq!(loaded.count, 2);
        assert_eq!(loaded.rows[1].record.title, "B");
        assert!(storage.load_dataset("news").unwrap().is_none());
    }

    #[test]
    fn test_list_datasets_and_report() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage.write_dataset(&dataset("news", &["A"])).unwrap();
        storage.write_dataset(&dataset("all", &["A"])).unwrap();
        storage
            .write_report(&RunReport {
                started_at: Utc::now(),
                finished_at: Utc::now(),
                groups: vec!["episode".to_string()],
                categories: Vec::new(),
                merged_rows: 1,
                diagnostics: Diagnostics::default(),
            })
            .unwrap();

        assert_eq!(storage.list_datasets().unwrap(), vec!["all", "news"]);
        assert!(tmp.path().join("report.json").exists());
    }

    #[test]
    fn test_custom_layout() {
        let tmp = TempDir::new().unwrap();
        let paths = PathsConfig {
            dataset_dir: "out".to_string(),
            ..PathsConfig::default()
        };
        let storage = LocalStorage::with_paths(tmp.path(), &paths);
        storage.write_dataset(&dataset("news", &["A"])).unwrap();
        assert!(tmp.path().join("out/news.json").exists());
        assert_eq!(storage.path("lookup/followers.json"), tmp.path().join("lookup/followers.json"));
    }
}
