//! Main bundle definition parser

use crate::error::{BundleParseError, BundleResult};
use crate::types::*;
use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Bundle definition parser
pub struct BundleParser;

impl BundleParser {
    /// Parse a bundle definition from a string (auto-detects JSON/YAML)
    pub fn parse(content: &str) -> BundleResult<BundleDefinition> {
        let trimmed = content.trim_start();
        if trimmed.is_empty() {
            return Err(BundleParseError::InvalidFormat("document is empty".to_string()));
        }

        if trimmed.starts_with('{') {
            Self::parse_json(content)
        } else {
            Self::parse_yaml(content)
        }
    }

    /// Parse a bundle definition from JSON
    pub fn parse_json(content: &str) -> BundleResult<BundleDefinition> {
        let raw: RawBundle = serde_json::from_str(content)?;
        Self::convert(raw)
    }

    /// Parse a bundle definition from YAML
    pub fn parse_yaml(content: &str) -> BundleResult<BundleDefinition> {
        let raw: RawBundle = serde_yaml::from_str(content)?;
        Self::convert(raw)
    }

    /// Read and parse a bundle definition file
    pub fn parse_file(path: &Path) -> BundleResult<BundleDefinition> {
        debug!("Reading bundle definition from {:?}", path);
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::parse_json(&content),
            Some("yaml") | Some("yml") => Self::parse_yaml(&content),
            _ => Self::parse(&content),
        }
    }

    /// Fetch and parse a bundle definition from a URL
    pub async fn fetch_and_parse(url: &str) -> BundleResult<BundleDefinition> {
        let parsed = Url::parse(url).map_err(|e| BundleParseError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(BundleParseError::InvalidUrl(format!(
                "unsupported scheme '{}' in {}",
                parsed.scheme(),
                url
            )));
        }

        info!("Fetching bundle definition from: {}", url);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| BundleParseError::FetchError(e.to_string()))?;

        let response = client
            .get(parsed)
            .header("Accept", "application/json, application/yaml, text/yaml")
            .send()
            .await
            .map_err(|e| BundleParseError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BundleParseError::FetchError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let content = response
            .text()
            .await
            .map_err(|e| BundleParseError::FetchError(e.to_string()))?;

        if content_type.contains("yaml") || url.ends_with(".yaml") || url.ends_with(".yml") {
            Self::parse_yaml(&content)
        } else {
            Self::parse(&content)
        }
    }

    /// Convert a raw document to a bundle definition
    fn convert(raw: RawBundle) -> BundleResult<BundleDefinition> {
        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| BundleParseError::MissingField("name".to_string()))?;

        let credentials = match raw.credentials {
            None => IndexMap::new(),
            Some(RawCredentials::Map(map)) => map,
            Some(RawCredentials::List(list)) => {
                let mut map = IndexMap::with_capacity(list.len());
                for entry in list {
                    if entry.name.is_empty() {
                        return Err(BundleParseError::MissingField("credentials[].name".to_string()));
                    }
                    if map.contains_key(&entry.name) {
                        return Err(BundleParseError::DuplicateCredential(entry.name));
                    }
                    map.insert(entry.name, entry.requirement);
                }
                map
            }
        };

        debug!(
            "Parsed bundle {} declaring {} credentials",
            name,
            credentials.len()
        );

        Ok(BundleDefinition {
            name,
            version: raw.version,
            description: raw.description,
            credentials,
        })
    }
}
