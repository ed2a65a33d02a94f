//! File storage backend
//!
//! Stores all entries in a single JSON file in the user's data directory.
//! The file is loaded into an in-memory cache; every mutation is written
//! atomically to disk first and only then applied to the cache, so a failed
//! write leaves both unchanged.

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::Storage;
use crate::error::{CredentialError, Result};

/// Current on-disk format version
const STORAGE_VERSION: u32 = 1;

type Entries = BTreeMap<String, String>;

/// JSON file storage backend
pub struct FileStorage {
    /// Directory for storage files
    storage_dir: PathBuf,
    /// Map of key -> serialized value, mirroring the file
    cache: Arc<RwLock<Entries>>,
}

/// File format for persistent storage
#[derive(Debug, Serialize, Deserialize)]
struct StorageFile {
    version: u32,
    entries: Entries,
}

impl FileStorage {
    /// Open storage in the given directory, loading any existing data
    pub async fn open(storage_dir: PathBuf) -> Result<Self> {
        let storage = Self::with_dir(storage_dir)?;
        storage.load().await?;
        Ok(storage)
    }

    /// Create with a custom storage directory without loading it
    pub fn with_dir(storage_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&storage_dir)?;

        debug!("File storage initialized at: {:?}", storage_dir);

        Ok(Self {
            storage_dir,
            cache: Arc::new(RwLock::new(Entries::new())),
        })
    }

    /// Get the default data directory
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "symbia-labs", "credset")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                CredentialError::StorageError("Could not determine data directory".to_string())
            })
    }

    /// Get the path to the storage file
    fn storage_file_path(&self) -> PathBuf {
        self.storage_dir.join("credentials.json")
    }

    /// Get the storage directory path
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Load storage from disk, replacing the cache
    pub async fn load(&self) -> Result<()> {
        let path = self.storage_file_path();

        if !path.exists() {
            debug!("No existing storage file found");
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&path).await?;
        let file: StorageFile = serde_json::from_str(&contents)?;

        if file.version != STORAGE_VERSION {
            return Err(CredentialError::StorageError(format!(
                "unsupported storage file version {} in {:?}",
                file.version, path
            )));
        }

        let mut cache = self.cache.write().await;
        *cache = file.entries;

        debug!("Loaded {} entries from storage", cache.len());
        Ok(())
    }

    /// Write `entries` to disk atomically
    async fn write_file(&self, entries: &Entries) -> Result<()> {
        let file = StorageFile {
            version: STORAGE_VERSION,
            entries: entries.clone(),
        };

        let contents = serde_json::to_string_pretty(&file)?;
        let path = self.storage_file_path();

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Saved {} entries to storage", entries.len());
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn store(&self, key: &str, value: &[u8]) -> Result<()> {
        let value = String::from_utf8(value.to_vec())
            .map_err(|e| CredentialError::StorageError(format!("value for {} is not UTF-8: {}", key, e)))?;

        let mut cache = self.cache.write().await;
        let mut updated = cache.clone();
        updated.insert(key.to_string(), value);

        self.write_file(&updated).await?;
        *cache = updated;

        debug!("Stored key: {}", key);
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cache = self.cache.read().await;

        match cache.get(key) {
            Some(value) => {
                debug!("Retrieved key: {}", key);
                Ok(Some(value.clone().into_bytes()))
            }
            None => {
                debug!("Key not found: {}", key);
                Ok(None)
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut cache = self.cache.write().await;
        if !cache.contains_key(key) {
            return Ok(false);
        }

        let mut updated = cache.clone();
        updated.remove(key);

        self.write_file(&updated).await?;
        *cache = updated;

        debug!("Deleted key: {}", key);
        Ok(true)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let cache = self.cache.read().await;
        Ok(cache.contains_key(key))
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let cache = self.cache.read().await;

        Ok(cache
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "JSON file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        let storage = FileStorage::open(temp_dir.path().to_path_buf()).await.unwrap();
        storage.store("credentialset//mybuns", b"{}").await.unwrap();
        storage.store("credentialset/dev/other", b"[]").await.unwrap();

        let reopened = FileStorage::open(temp_dir.path().to_path_buf()).await.unwrap();
        assert_eq!(
            reopened.retrieve("credentialset//mybuns").await.unwrap(),
            Some(b"{}".to_vec())
        );
        assert_eq!(
            reopened.list_keys("credentialset/dev/").await.unwrap(),
            vec!["credentialset/dev/other"]
        );
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path().to_path_buf()).await.unwrap();

        storage.store("k", b"v").await.unwrap();
        assert!(storage.delete("k").await.unwrap());
        assert!(!storage.delete("k").await.unwrap());

        let reopened = FileStorage::open(temp_dir.path().to_path_buf()).await.unwrap();
        assert!(!reopened.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_unknown_version() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("credentials.json"),
            r#"{"version": 99, "entries": {}}"#,
        )
        .unwrap();

        let err = FileStorage::open(temp_dir.path().to_path_buf())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, CredentialError::StorageError(_)));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path().to_path_buf()).await.unwrap();
        storage.store("credentialset//kept", b"{}").await.unwrap();

        // A directory in the temp file's place makes every write fail
        std::fs::create_dir(temp_dir.path().join("credentials.tmp")).unwrap();

        assert!(storage.store("credentialset//mybuns", b"{}").await.is_err());
        assert_eq!(storage.retrieve("credentialset//mybuns").await.unwrap(), None);

        assert!(storage.delete("credentialset//kept").await.is_err());
        assert!(storage.exists("credentialset//kept").await.unwrap());

        std::fs::remove_dir(temp_dir.path().join("credentials.tmp")).unwrap();
        let reopened = FileStorage::open(temp_dir.path().to_path_buf()).await.unwrap();
        assert_eq!(
            reopened.list_keys("").await.unwrap(),
            vec!["credentialset//kept"]
        );

        assert!(storage.delete("credentialset//kept").await.unwrap());
    }

    #[tokio::test]
    async fn test_fresh_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("credset");
        let storage = FileStorage::open(dir.clone()).await.unwrap();

        assert!(storage.list_keys("").await.unwrap().is_empty());
        assert_eq!(storage.storage_dir(), dir.as_path());
        assert_eq!(storage.backend_name(), "JSON file");
        assert!(!dir.join("credentials.json").exists());
    }
}
