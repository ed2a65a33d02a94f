//! Bundle resolution for credential generation

use async_trait::async_trait;
use bundle_parser::{BundleDefinition, BundleParser};
use std::path::PathBuf;
use tracing::debug;

use crate::error::{CredentialError, Result};

/// Definition files looked for in the working directory, in order
const DEFAULT_BUNDLE_FILES: &[&str] = &["porter.yaml", "bundle.json"];

/// Identifies the bundle an action works against
#[derive(Debug, Clone, Default)]
pub struct BundleActionOptions {
    /// Local bundle definition
    pub file: Option<PathBuf>,
    /// URL of a published bundle definition
    pub reference: Option<String>,
}

impl BundleActionOptions {
    /// Check the options and fill in a default definition file if none was given
    pub fn validate(&mut self) -> Result<()> {
        if self.file.is_some() && self.reference.is_some() {
            return Err(CredentialError::ValidationError(
                "cannot specify both --file and --reference".to_string(),
            ));
        }

        if self.reference.is_some() {
            return Ok(());
        }

        match &self.file {
            Some(file) if !file.is_file() => Err(CredentialError::ValidationError(format!(
                "unable to access --file {}: file does not exist",
                file.display()
            ))),
            Some(_) => Ok(()),
            None => {
                let default = DEFAULT_BUNDLE_FILES
                    .iter()
                    .map(PathBuf::from)
                    .find(|p| p.is_file())
                    .ok_or_else(|| {
                        CredentialError::ValidationError(format!(
                            "no bundle specified: use --file or --reference, or run from a directory containing one of {}",
                            DEFAULT_BUNDLE_FILES.join(", ")
                        ))
                    })?;
                debug!("Using bundle definition {:?}", default);
                self.file = Some(default);
                Ok(())
            }
        }
    }
}

/// Resolves the bundle named by action options
#[async_trait]
pub trait BundleResolver: Send + Sync {
    async fn resolve(&self, opts: &BundleActionOptions) -> Result<BundleDefinition>;
}

/// Resolves bundles from definition files or URLs
#[derive(Debug, Default)]
pub struct DefinitionResolver;

impl DefinitionResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BundleResolver for DefinitionResolver {
    async fn resolve(&self, opts: &BundleActionOptions) -> Result<BundleDefinition> {
        let bundle = match (&opts.reference, &opts.file) {
            (Some(reference), _) => BundleParser::fetch_and_parse(reference)
                .await
                .map_err(|e| {
                    CredentialError::BundleError(format!("unable to resolve {}: {}", reference, e))
                })?,
            (None, Some(file)) => BundleParser::parse_file(file).map_err(|e| {
                CredentialError::BundleError(format!("unable to load {}: {}", file.display(), e))
            })?,
            (None, None) => {
                return Err(CredentialError::ValidationError(
                    "no bundle specified".to_string(),
                ))
            }
        };

        debug!(
            "Resolved bundle {} with {} credentials",
            bundle.name,
            bundle.credentials.len()
        );
        Ok(bundle)
    }
}
