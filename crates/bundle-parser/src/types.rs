//! Type definitions for parsed bundle definitions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A credential declared by a bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequirement {
    /// Human readable description shown when prompting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the bundle refuses to run without it
    #[serde(default)]
    pub required: bool,
    /// Environment variable the bundle reads the credential from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    /// File path the bundle reads the credential from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Actions the credential applies to (empty = all)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apply_to: Vec<String>,
}

/// A parsed bundle definition, reduced to what credential management needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDefinition {
    /// Bundle name
    pub name: String,
    /// Bundle version
    pub version: Option<String>,
    /// Bundle description
    pub description: Option<String>,
    /// Declared credentials, keyed by credential name
    pub credentials: IndexMap<String, CredentialRequirement>,
}

impl BundleDefinition {
    /// Credential names in sorted order
    pub fn credential_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.credentials.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ============================================================================
// Raw document types (for deserialization)
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct RawBundle {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub credentials: Option<RawCredentials>,
}

/// CNAB declares credentials as a map, porter manifests as a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawCredentials {
    Map(IndexMap<String, CredentialRequirement>),
    List(Vec<NamedRequirement>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedRequirement {
    pub name: String,
    #[serde(flatten)]
    pub requirement: CredentialRequirement,
}
