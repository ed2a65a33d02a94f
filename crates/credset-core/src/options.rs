//! Command options and their validation

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::bundle::BundleActionOptions;
use crate::encoding::DocumentFormat;
use crate::error::{CredentialError, Result};
use crate::printer::OutputFormat;

/// Output selection shared by commands that print
#[derive(Debug, Clone, Default)]
pub struct PrintOptions {
    /// Value given to `--output`
    pub raw_format: String,
    /// Parsed format, set by `parse_format`
    pub format: OutputFormat,
}

impl PrintOptions {
    pub fn new(raw_format: impl Into<String>) -> Self {
        Self {
            raw_format: raw_format.into(),
            format: OutputFormat::default(),
        }
    }

    /// Parse `raw_format` into `format`
    pub fn parse_format(&mut self) -> Result<()> {
        self.format = self.raw_format.parse()?;
        Ok(())
    }
}

/// Options for listing credential sets
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub print: PrintOptions,
    pub namespace: String,
    pub all_namespaces: bool,
    /// Substring filter on the set name
    pub name: String,
    /// Label filters in `key=value` form
    pub labels: Vec<String>,
}

impl ListOptions {
    pub fn validate(&mut self) -> Result<()> {
        parse_labels(&self.labels)?;
        self.print.parse_format()
    }

    /// Namespace to list, `None` for all namespaces
    pub fn get_namespace(&self) -> Option<&str> {
        if self.all_namespaces {
            None
        } else {
            Some(&self.namespace)
        }
    }

    pub fn parse_labels(&self) -> Result<HashMap<String, String>> {
        Ok(parse_labels(&self.labels)?.into_iter().collect())
    }
}

/// Options for showing one credential set
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub print: PrintOptions,
    pub name: String,
    pub namespace: String,
}

impl ShowOptions {
    pub fn validate(&mut self, args: &[String]) -> Result<()> {
        validate_credential_name(args)?;
        self.name = args[0].clone();
        self.print.parse_format()
    }
}

/// Options for editing one credential set
#[derive(Debug, Clone, Default)]
pub struct EditOptions {
    pub name: String,
    pub namespace: String,
}

impl EditOptions {
    pub fn validate(&mut self, args: &[String]) -> Result<()> {
        validate_credential_name(args)?;
        self.name = args[0].clone();
        Ok(())
    }
}

/// Options for deleting one credential set
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    pub name: String,
    pub namespace: String,
}

impl DeleteOptions {
    pub fn validate(&mut self, args: &[String]) -> Result<()> {
        validate_credential_name(args)?;
        self.name = args[0].clone();
        Ok(())
    }
}

/// Options for generating a credential set from a bundle
#[derive(Debug, Clone, Default)]
pub struct CredentialOptions {
    pub bundle: BundleActionOptions,
    /// Set name; defaults to the bundle name
    pub name: String,
    pub namespace: String,
    pub silent: bool,
    pub labels: Vec<String>,
}

impl CredentialOptions {
    pub fn validate(&mut self, args: &[String]) -> Result<()> {
        match args {
            [] => {}
            [name] => self.name = name.clone(),
            _ => return Err(too_many_args(args)),
        }
        parse_labels(&self.labels)?;
        self.bundle.validate()
    }

    pub fn parse_labels(&self) -> Result<BTreeMap<String, String>> {
        parse_labels(&self.labels)
    }
}

/// Options for applying a credential set document
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    pub file: PathBuf,
    /// Used when the document does not name a namespace
    pub namespace: String,
}

impl ApplyOptions {
    pub fn validate(&mut self, args: &[String]) -> Result<()> {
        match args {
            [] => {
                return Err(CredentialError::ValidationError(
                    "a file argument is required".to_string(),
                ))
            }
            [file] => self.file = PathBuf::from(file),
            _ => {
                return Err(CredentialError::ValidationError(format!(
                    "only one file argument may be specified, but multiple were received: [{}]",
                    args.join(" ")
                )))
            }
        }

        if !self.file.is_file() {
            return Err(CredentialError::ValidationError(format!(
                "invalid file argument {}: file does not exist",
                self.file.display()
            )));
        }

        DocumentFormat::from_path(&self.file)
            .map_err(|e| CredentialError::ValidationError(e.to_string()))?;
        Ok(())
    }
}

fn validate_credential_name(args: &[String]) -> Result<()> {
    match args.len() {
        0 => Err(CredentialError::ValidationError(
            "no credential name was specified".to_string(),
        )),
        1 => Ok(()),
        _ => Err(too_many_args(args)),
    }
}

fn too_many_args(args: &[String]) -> CredentialError {
    CredentialError::ValidationError(format!(
        "only one positional argument may be specified, the credential name, but multiple were received: [{}]",
        args.join(" ")
    ))
}

/// Parse `key=value` labels
pub fn parse_labels(labels: &[String]) -> Result<BTreeMap<String, String>> {
    labels
        .iter()
        .map(|label| match label.split_once('=') {
            Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
            _ => Err(CredentialError::ValidationError(format!(
                "invalid label {:?}, expected key=value",
                label
            ))),
        })
        .collect()
}
