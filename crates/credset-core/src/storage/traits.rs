//! Storage trait definitions

use crate::error::Result;
use async_trait::async_trait;

/// Flat key/value persistence underneath the credential store
///
/// Keys are `/`-separated paths; values are opaque bytes.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `value` under `key`, replacing any previous value
    async fn store(&self, key: &str, value: &[u8]) -> Result<()>;

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove `key`, returning false if it was not present
    async fn delete(&self, key: &str) -> Result<bool>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Keys starting with `prefix`, in lexical order
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Short backend description for diagnostics
    fn backend_name(&self) -> &'static str;
}
