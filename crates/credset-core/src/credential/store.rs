//! Namespaced credential set store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::types::CredentialSet;
use crate::error::{CredentialError, Result};
use crate::storage::Storage;

/// Storage key prefix for credential sets
const CREDENTIAL_SET_PREFIX: &str = "credentialset/";

/// Source kinds understood by bundle runtimes
pub const DEFAULT_SOURCE_KINDS: &[&str] = &["env", "path", "command", "value", "secret"];

/// Persistent, namespaced storage of credential sets
///
/// Implementations own all persisted state. Concurrent writers to the same
/// (namespace, name) are not coordinated: the last write wins.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// List sets, optionally restricted to one namespace (`None` = all),
    /// a name substring and exact label matches
    async fn list_credential_sets(
        &self,
        namespace: Option<&str>,
        name: &str,
        labels: &HashMap<String, String>,
    ) -> Result<Vec<CredentialSet>>;

    /// Fetch a set, failing with `NotFound` if absent
    async fn get_credential_set(&self, namespace: &str, name: &str) -> Result<CredentialSet>;

    /// Create or replace a set
    async fn upsert_credential_set(&self, set: &CredentialSet) -> Result<()>;

    /// Replace an existing set, failing with `NotFound` if absent
    async fn update_credential_set(&self, set: &CredentialSet) -> Result<()>;

    /// Remove a set, failing with `NotFound` if absent
    async fn remove_credential_set(&self, namespace: &str, name: &str) -> Result<()>;

    /// Store-specific semantic checks
    fn validate(&self, set: &CredentialSet) -> Result<()>;
}

/// Credential store backed by a key/value [`Storage`]
pub struct StorageCredentialStore {
    /// Storage backend
    storage: Arc<dyn Storage>,
    /// Source kinds accepted by `validate`
    source_kinds: Vec<String>,
}

impl StorageCredentialStore {
    /// Create a store accepting the default source kinds
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_source_kinds(
            storage,
            DEFAULT_SOURCE_KINDS.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Create a store accepting a custom set of source kinds
    pub fn with_source_kinds(storage: Arc<dyn Storage>, source_kinds: Vec<String>) -> Self {
        Self {
            storage,
            source_kinds,
        }
    }

    fn storage_key(namespace: &str, name: &str) -> String {
        format!("{}{}/{}", CREDENTIAL_SET_PREFIX, namespace, name)
    }

    fn list_prefix(namespace: Option<&str>) -> String {
        match namespace {
            Some(ns) => format!("{}{}/", CREDENTIAL_SET_PREFIX, ns),
            None => CREDENTIAL_SET_PREFIX.to_string(),
        }
    }

    async fn save(&self, set: &CredentialSet) -> Result<()> {
        let key = Self::storage_key(&set.namespace, &set.name);
        let data = serde_json::to_vec(set)?;
        self.storage.store(&key, &data).await
    }
}

#[async_trait]
impl CredentialStore for StorageCredentialStore {
    async fn list_credential_sets(
        &self,
        namespace: Option<&str>,
        name: &str,
        labels: &HashMap<String, String>,
    ) -> Result<Vec<CredentialSet>> {
        let keys = self.storage.list_keys(&Self::list_prefix(namespace)).await?;
        let mut sets = Vec::new();

        for key in keys {
            let Some(data) = self.storage.retrieve(&key).await? else {
                warn!("Credential set key exists but no data: {}", key);
                continue;
            };
            let set: CredentialSet = serde_json::from_slice(&data)?;

            if namespace.is_some_and(|ns| set.namespace != ns) {
                continue;
            }
            if !name.is_empty() && !set.name.contains(name) {
                continue;
            }
            if !labels
                .iter()
                .all(|(k, v)| set.labels.get(k).is_some_and(|actual| actual == v))
            {
                continue;
            }

            sets.push(set);
        }

        sets.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));
        debug!("Listed {} credential sets", sets.len());
        Ok(sets)
    }

    async fn get_credential_set(&self, namespace: &str, name: &str) -> Result<CredentialSet> {
        let key = Self::storage_key(namespace, name);

        let data = self
            .storage
            .retrieve(&key)
            .await?
            .ok_or_else(|| CredentialError::not_found(namespace, name))?;

        Ok(serde_json::from_slice(&data)?)
    }

    async fn upsert_credential_set(&self, set: &CredentialSet) -> Result<()> {
        self.save(set).await?;
        info!("Saved credential set: {}", set.key());
        Ok(())
    }

    async fn update_credential_set(&self, set: &CredentialSet) -> Result<()> {
        let key = Self::storage_key(&set.namespace, &set.name);
        if !self.storage.exists(&key).await? {
            return Err(CredentialError::not_found(&set.namespace, &set.name));
        }

        self.save(set).await?;
        info!("Updated credential set: {}", set.key());
        Ok(())
    }

    async fn remove_credential_set(&self, namespace: &str, name: &str) -> Result<()> {
        let key = Self::storage_key(namespace, name);
        if !self.storage.delete(&key).await? {
            return Err(CredentialError::not_found(namespace, name));
        }

        info!("Removed credential set: {}/{}", namespace, name);
        Ok(())
    }

    fn validate(&self, set: &CredentialSet) -> Result<()> {
        set.validate()?;

        for cred in &set.credentials {
            if !self.source_kinds.iter().any(|k| *k == cred.source.key) {
                return Err(CredentialError::ValidationError(format!(
                    "invalid source '{}' for credential {}: supported sources are {}",
                    cred.source.key,
                    cred.name,
                    self.source_kinds.join(", ")
                )));
            }
            if cred.source.value.is_empty() {
                return Err(CredentialError::ValidationError(format!(
                    "credential {} has an empty {} source",
                    cred.name, cred.source.key
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::types::{CredentialStrategy, Source};
    use crate::storage::MemoryStorage;

    fn store() -> StorageCredentialStore {
        StorageCredentialStore::new(Arc::new(MemoryStorage::new()))
    }

    fn set(namespace: &str, name: &str) -> CredentialSet {
        let mut set = CredentialSet::new(namespace, name);
        set.credentials
            .push(CredentialStrategy::new("token", Source::new("env", "TOKEN")));
        set
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let store = store();
        store.upsert_credential_set(&set("dev", "mybuns")).await.unwrap();

        let fetched = store.get_credential_set("dev", "mybuns").await.unwrap();
        assert_eq!(fetched, set("dev", "mybuns"));

        let err = store.get_credential_set("", "mybuns").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_requires_existing() {
        let store = store();

        let err = store
            .update_credential_set(&set("", "missing"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        store.upsert_credential_set(&set("", "present")).await.unwrap();
        let mut changed = set("", "present");
        changed.labels.insert("env".to_string(), "prod".to_string());
        store.update_credential_set(&changed).await.unwrap();

        let fetched = store.get_credential_set("", "present").await.unwrap();
        assert_eq!(fetched.labels["env"], "prod");
    }

    #[tokio::test]
    async fn test_remove() {
        let store = store();
        store.upsert_credential_set(&set("", "gone")).await.unwrap();

        store.remove_credential_set("", "gone").await.unwrap();
        let err = store.remove_credential_set("", "gone").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let store = store();
        let mut labelled = set("dev", "wordpress");
        labelled.labels.insert("team".to_string(), "web".to_string());

        store.upsert_credential_set(&labelled).await.unwrap();
        store.upsert_credential_set(&set("dev", "mysql")).await.unwrap();
        store.upsert_credential_set(&set("", "mysql")).await.unwrap();
        store.upsert_credential_set(&set("dev2", "redis")).await.unwrap();

        let all = store
            .list_credential_sets(None, "", &HashMap::new())
            .await
            .unwrap();
        let keys: Vec<String> = all.iter().map(|s| s.key()).collect();
        assert_eq!(keys, vec!["mysql", "dev/mysql", "dev/wordpress", "dev2/redis"]);

        let dev = store
            .list_credential_sets(Some("dev"), "", &HashMap::new())
            .await
            .unwrap();
        assert_eq!(dev.len(), 2);

        let global = store
            .list_credential_sets(Some(""), "", &HashMap::new())
            .await
            .unwrap();
        assert_eq!(global.len(), 1);

        let by_name = store
            .list_credential_sets(None, "sql", &HashMap::new())
            .await
            .unwrap();
        assert_eq!(by_name.len(), 2);

        let labels = HashMap::from([("team".to_string(), "web".to_string())]);
        let by_label = store
            .list_credential_sets(Some("dev"), "", &labels)
            .await
            .unwrap();
        assert_eq!(by_label.len(), 1);
        assert_eq!(by_label[0].name, "wordpress");
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let sets = store()
            .list_credential_sets(None, "", &HashMap::new())
            .await
            .unwrap();
        assert!(sets.is_empty());
    }

    #[test]
    fn test_validate_source_kinds() {
        let store = store();
        assert!(store.validate(&set("", "ok")).is_ok());

        let mut bad = set("", "bad");
        bad.credentials[0].source.key = "vault".to_string();
        let err = store.validate(&bad).unwrap_err();
        assert!(err.to_string().contains("invalid source 'vault'"));

        let custom = StorageCredentialStore::with_source_kinds(
            Arc::new(MemoryStorage::new()),
            vec!["vault".to_string()],
        );
        assert!(custom.validate(&bad).is_ok());

        let mut empty = set("", "empty");
        empty.credentials[0].source.value.clear();
        assert!(store.validate(&empty).is_err());
    }
}
