use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use anyhow::Result;

use crate::store::{KeyValueStore, StoreError};

/// File-backed store: each key lives in `<base_dir>/<key>.json`.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("neonquiz");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        let store = Self { base_dir };
        store.remove_stale_temp_files();
        Ok(store)
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// Drop `.tmp` leftovers from a write interrupted before its rename.
    fn remove_stale_temp_files(&self) -> usize {
        let Ok(entries) = fs::read_dir(&self.base_dir) else {
            return 0;
        };
        let mut removed = 0;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().and_then(|x| x.to_str()) == Some("tmp")
                && fs::remove_file(&path).is_ok()
            {
                log::info!("Removed interrupted write {}", path.display());
                removed += 1;
            }
        }
        removed
    }
}

impl KeyValueStore for JsonStore {
    fn read(&self, key: &str) -> Option<String> {
        let path = self.file_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn write_then_read_back() {
        let (_dir, store) = make_test_store();
        store.write("ranking", "[1,2,3]").unwrap();
        assert_eq!(store.read("ranking").as_deref(), Some("[1,2,3]"));
        assert!(store.file_path("ranking").exists());
    }

    #[test]
    fn missing_key_reads_none() {
        let (_dir, store) = make_test_store();
        assert!(store.read("error_history").is_none());
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let (_dir, store) = make_test_store();
        store.remove("favorites").unwrap();
        store.write("favorites", "[]").unwrap();
        store.remove("favorites").unwrap();
        assert!(store.read("favorites").is_none());
    }

    #[test]
    fn write_leaves_no_tmp_files() {
        let (dir, store) = make_test_store();
        store.write("ranking", "[]").unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn stale_tmp_files_are_cleaned_on_open() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ranking.tmp"), "[").unwrap();
        let _store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert!(!dir.path().join("ranking.tmp").exists());
    }

    #[test]
    fn write_into_missing_dir_fails() {
        let (dir, _store) = make_test_store();
        let bad_store = JsonStore {
            base_dir: dir.path().join("nonexistent_subdir"),
        };
        assert!(bad_store.write("ranking", "[]").is_err());
    }
}
