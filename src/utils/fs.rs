// src/utils/fs.rs

//! File system utilities.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// Load JSON data from a file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load TOML configuration from a file.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Write JSON with pretty printing, atomically (temp file, then rename).
pub fn save_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    ensure_parent(path)?;
    let bytes = serde_json::to_vec_pretty(data)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reject a name that cannot be used as a bare file stem inside one directory.
pub fn check_stem(what: &str, name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{what} is empty")));
    }
    if trimmed.contains(['/', '\\']) || trimmed == ".." || trimmed == "." {
        return Err(AppError::validation(format!(
            "{what} {name:?} is not a plain file name"
        )));
    }
    Ok(())
}

/// Ensure the parent directory of a file exists.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/table.json");

        let mut table = BTreeMap::new();
        table.insert("Show".to_string(), 42u64);
        save_json(&path, &table).unwrap();

        let loaded: BTreeMap<String, u64> = load_json(&path).unwrap();
        assert_eq!(loaded, table);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_check_stem() {
        assert!(check_stem("category", "comedy").is_ok());
        assert!(check_stem("category", "true-crime").is_ok());
        assert!(check_stem("category", "").is_err());
        assert!(check_stem("category", "../x").is_err());
        assert!(check_stem("category", "a\\b").is_err());
        assert!(check_stem("category", "..").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let result: Result<BTreeMap<String, u64>> = load_json(&tmp.path().join("nope.json"));
        assert!(result.is_err());
    }
}
