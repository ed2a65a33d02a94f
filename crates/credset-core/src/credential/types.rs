//! Credential set type definitions

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{CredentialError, Result};

/// Schema version written into every credential set document
pub const SCHEMA_VERSION: &str = "1.0.1";

/// Characters that may not appear in a credential set name
const INVALID_NAME_CHARS: &[char] = &['.', '/', '\\'];

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// Where the value of a credential comes from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Source kind, e.g. "env", "path", "command", "value" or "secret"
    #[serde(default)]
    pub key: String,
    /// Locator interpreted according to the kind
    #[serde(default)]
    pub value: String,
}

impl Source {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A single entry of a credential set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialStrategy {
    /// Name of the credential the bundle requires
    #[serde(default)]
    pub name: String,
    /// Where to read the value from
    #[serde(default)]
    pub source: Source,
}

impl CredentialStrategy {
    pub fn new(name: impl Into<String>, source: Source) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}

/// A named, namespaced set of credential strategies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSet {
    /// Document schema version
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Name, unique within the namespace
    #[serde(default)]
    pub name: String,

    /// Namespace (empty = global)
    #[serde(default)]
    pub namespace: String,

    /// First persisted
    #[serde(default)]
    pub created: DateTime<Utc>,

    /// Last modified
    #[serde(default)]
    pub modified: DateTime<Utc>,

    /// Arbitrary user metadata
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Credential entries
    #[serde(default)]
    pub credentials: Vec<CredentialStrategy>,
}

impl CredentialSet {
    /// Create an empty set; timestamps are left unset until persisted
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            schema_version: default_schema_version(),
            name: name.to_string(),
            namespace: namespace.to_string(),
            created: DateTime::<Utc>::default(),
            modified: DateTime::<Utc>::default(),
            labels: BTreeMap::new(),
            credentials: Vec::new(),
        }
    }

    /// Display key used in messages
    pub fn key(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.namespace, self.name)
        }
    }

    /// Look up an entry by name
    pub fn get(&self, name: &str) -> Option<&CredentialStrategy> {
        self.credentials.iter().find(|c| c.name == name)
    }

    /// Bump `modified`, keeping it strictly increasing even if the clock stalls
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.modified = if now > self.modified {
            now
        } else {
            self.modified + Duration::nanoseconds(1)
        };
    }

    /// Structural validation of the document
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(CredentialError::ValidationError(format!(
                "invalid schemaVersion provided: {}. This version of credset is compatible with {}",
                self.schema_version, SCHEMA_VERSION
            )));
        }

        validate_name(&self.name)?;

        if self.namespace.contains('/') {
            return Err(CredentialError::ValidationError(format!(
                "namespace '{}' cannot contain '/'",
                self.namespace
            )));
        }

        let mut seen = HashSet::new();
        for (i, cred) in self.credentials.iter().enumerate() {
            if cred.name.is_empty() {
                return Err(CredentialError::ValidationError(format!(
                    "credentials[{}] is missing a name",
                    i
                )));
            }
            if cred.source.key.is_empty() {
                return Err(CredentialError::ValidationError(format!(
                    "credential {} is missing a source",
                    cred.name
                )));
            }
            if !seen.insert(cred.name.as_str()) {
                return Err(CredentialError::ValidationError(format!(
                    "duplicate credential {} in credential set {}",
                    cred.name, self.name
                )));
            }
        }

        Ok(())
    }
}

/// Validate a credential set name
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CredentialError::ValidationError(
            "credential set name is required".to_string(),
        ));
    }
    if name.contains(INVALID_NAME_CHARS) {
        return Err(CredentialError::ValidationError(format!(
            "credential set name '{}' cannot contain the following characters: './\\'",
            name
        )));
    }
    Ok(())
}
