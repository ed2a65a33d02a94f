//! YAML/JSON document encoding

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Document encoding error types
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported file format {0:?}, expected .json, .yaml or .yml")]
    UnsupportedFormat(String),
}

/// Structured document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, EncodingError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            other => Err(EncodingError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

/// Serialize a value in the given format
pub fn marshal<T: Serialize>(format: DocumentFormat, value: &T) -> Result<Vec<u8>, EncodingError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::to_vec_pretty(value)?),
        DocumentFormat::Yaml => Ok(serde_yaml::to_string(value)?.into_bytes()),
    }
}

/// Deserialize a value from the given format
pub fn unmarshal<T: DeserializeOwned>(
    format: DocumentFormat,
    data: &[u8],
) -> Result<T, EncodingError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_slice(data)?),
        DocumentFormat::Yaml => Ok(serde_yaml::from_slice(data)?),
    }
}

/// Read and deserialize a file, picking the format from its extension
pub fn unmarshal_file<T: DeserializeOwned>(path: &Path) -> Result<T, EncodingError> {
    let format = DocumentFormat::from_path(path)?;
    let data = std::fs::read(path)?;
    unmarshal(format, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{CredentialSet, CredentialStrategy, Source};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample() -> CredentialSet {
        let mut set = CredentialSet::new("dev", "mybuns");
        set.created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        set.modified = Utc.with_ymd_and_hms(2024, 3, 2, 8, 30, 15).unwrap();
        set.labels.insert("team".to_string(), "platform".to_string());
        set.credentials.push(CredentialStrategy::new(
            "kubeconfig",
            Source::new("path", "~/.kube/config"),
        ));
        set.credentials.push(CredentialStrategy::new(
            "token",
            Source::new("command", "gh auth token"),
        ));
        set
    }

    #[test]
    fn test_yaml_round_trip() {
        let set = sample();
        let data = marshal(DocumentFormat::Yaml, &set).unwrap();
        let back: CredentialSet = unmarshal(DocumentFormat::Yaml, &data).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_json_round_trip() {
        let set = sample();
        let data = marshal(DocumentFormat::Json, &set).unwrap();
        let back: CredentialSet = unmarshal(DocumentFormat::Json, &data).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_document_shape() {
        let data = marshal(DocumentFormat::Json, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&data).unwrap();

        assert_eq!(value["name"], "mybuns");
        assert_eq!(value["namespace"], "dev");
        assert_eq!(value["labels"]["team"], "platform");
        assert_eq!(value["credentials"][0]["name"], "kubeconfig");
        assert_eq!(value["credentials"][0]["source"]["key"], "path");
        assert_eq!(value["credentials"][0]["source"]["value"], "~/.kube/config");
        assert!(value["created"].is_string());
        assert!(value["modified"].is_string());
    }

    #[test]
    fn test_unmarshal_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("creds.yml");
        std::fs::write(&path, marshal(DocumentFormat::Yaml, &sample()).unwrap()).unwrap();

        let set: CredentialSet = unmarshal_file(&path).unwrap();
        assert_eq!(set, sample());

        let toml = dir.path().join("creds.toml");
        std::fs::write(&toml, "name = 'x'").unwrap();
        let err = unmarshal_file::<CredentialSet>(&toml).unwrap_err();
        assert!(matches!(err, EncodingError::UnsupportedFormat(ref ext) if ext == "toml"));
    }
}
