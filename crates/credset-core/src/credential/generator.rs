//! Generate credential sets from a bundle's declared credentials

use bundle_parser::CredentialRequirement;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::types::{validate_name, CredentialSet, CredentialStrategy, Source};
use crate::error::{CredentialError, Result};

/// Placeholder written for every entry of a silently generated set
const PLACEHOLDER_VALUE: &str = "TODO";

/// Source kinds offered when prompting, as (label, source key)
const SOURCE_CHOICES: &[(&str, &str)] = &[
    ("specific value", "value"),
    ("environment variable", "env"),
    ("file path", "path"),
    ("shell command", "command"),
    ("secret", "secret"),
];

/// Asks the operator where a credential's value should come from
pub trait SourcePrompter: Send + Sync {
    fn prompt_source(&self, name: &str, requirement: &CredentialRequirement) -> Result<Source>;
}

/// Prompter that asks on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl SourcePrompter for TerminalPrompter {
    fn prompt_source(&self, name: &str, requirement: &CredentialRequirement) -> Result<Source> {
        let theme = ColorfulTheme::default();

        let labels: Vec<&str> = SOURCE_CHOICES.iter().map(|(label, _)| *label).collect();
        let default_choice = if requirement.env.is_some() {
            1
        } else if requirement.path.is_some() {
            2
        } else {
            0
        };

        let choice = Select::with_theme(&theme)
            .with_prompt(source_prompt(name, requirement))
            .items(&labels)
            .default(default_choice)
            .interact()
            .map_err(|e| CredentialError::generation("prompt aborted", e))?;

        let (label, key) = SOURCE_CHOICES[choice];
        let suggestion = match key {
            "env" => requirement.env.clone(),
            "path" => requirement.path.clone(),
            _ => None,
        };

        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(format!("Enter the {} that will be used to set credential {:?}", label, name));
        if let Some(suggestion) = suggestion {
            input = input.default(suggestion);
        }

        let value = input
            .interact_text()
            .map_err(|e| CredentialError::generation("prompt aborted", e))?;

        Ok(Source::new(key, value))
    }
}

/// Question asked when choosing a credential's source kind
fn source_prompt(name: &str, requirement: &CredentialRequirement) -> String {
    match requirement.description.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(description) => format!(
            "How would you like to set credential {:?} ({})",
            name,
            description.trim()
        ),
        None => format!("How would you like to set credential {:?}", name),
    }
}

/// Inputs for generating a credential set
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Name of the new set
    pub name: String,
    /// Namespace of the new set
    pub namespace: String,
    /// Labels applied to the new set
    pub labels: BTreeMap<String, String>,
    /// Skip prompting and write placeholders
    pub silent: bool,
    /// Credentials declared by the bundle
    pub credentials: IndexMap<String, CredentialRequirement>,
}

/// Builds credential sets from bundle requirements
pub struct CredentialGenerator {
    prompter: Arc<dyn SourcePrompter>,
}

impl CredentialGenerator {
    /// Create a generator that prompts through the given prompter
    pub fn new(prompter: Arc<dyn SourcePrompter>) -> Self {
        Self { prompter }
    }

    /// Generate a set with one entry per declared credential, in name order
    pub fn generate(&self, opts: &GenerateOptions) -> Result<CredentialSet> {
        validate_name(&opts.name)
            .map_err(|e| CredentialError::generation("invalid credential set name", e))?;

        let mut set = CredentialSet::new(&opts.namespace, &opts.name);
        set.labels = opts.labels.clone();

        let mut names: Vec<&String> = opts.credentials.keys().collect();
        names.sort();

        for name in names {
            let source = if opts.silent {
                Source::new("value", PLACEHOLDER_VALUE)
            } else {
                self.prompter.prompt_source(name, &opts.credentials[name])?
            };

            debug!("Generated credential {} from {} source", name, source.key);
            set.credentials.push(CredentialStrategy::new(name.clone(), source));
        }

        set.validate()
            .map_err(|e| CredentialError::generation("generated credential set is invalid", e))?;

        Ok(set)
    }
}
