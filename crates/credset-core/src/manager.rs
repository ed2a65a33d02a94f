//! Credential set operations: list, show, generate, edit, apply and delete
//!
//! Every operation is a single read-modify-write against the store and fails
//! fast: nothing is persisted unless every earlier step succeeded. Writers are
//! not coordinated, so concurrent edits or applies of the same set from
//! different processes resolve as last-writer-wins.

use chrono::{DateTime, Utc};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

use crate::bundle::BundleResolver;
use crate::credential::{
    CredentialGenerator, CredentialSet, CredentialStore, GenerateOptions, SourcePrompter,
};
use crate::editor::Editor;
use crate::encoding::{self, DocumentFormat};
use crate::error::{CredentialError, Result};
use crate::options::{
    ApplyOptions, CredentialOptions, DeleteOptions, EditOptions, ListOptions, ShowOptions,
};
use crate::printer::{self, OutputFormat, TimePrinter};

/// Manager behaviour fixed at construction
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagerConfig {
    /// Report otherwise silent outcomes (e.g. deleting a missing set) on the error stream
    pub debug: bool,
}

/// Coordinates the store, bundle resolver, generator and editor
pub struct CredentialManager {
    store: Arc<dyn CredentialStore>,
    resolver: Arc<dyn BundleResolver>,
    editor: Arc<dyn Editor>,
    generator: CredentialGenerator,
    config: ManagerConfig,
}

impl CredentialManager {
    /// Create a new credential manager
    pub fn new(
        store: Arc<dyn CredentialStore>,
        resolver: Arc<dyn BundleResolver>,
        editor: Arc<dyn Editor>,
        prompter: Arc<dyn SourcePrompter>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            editor,
            generator: CredentialGenerator::new(prompter),
            config,
        }
    }

    /// List saved credential sets
    pub async fn list_credentials(&self, opts: &ListOptions) -> Result<Vec<CredentialSet>> {
        let labels = opts.parse_labels()?;
        self.store
            .list_credential_sets(opts.get_namespace(), &opts.name, &labels)
            .await
    }

    /// Print saved credential sets
    pub async fn print_credentials(&self, opts: &ListOptions, out: &mut dyn Write) -> Result<()> {
        let creds = self.list_credentials(opts).await?;

        match opts.print.format {
            OutputFormat::Json => printer::print_json(out, &creds),
            OutputFormat::Yaml => printer::print_yaml(out, &creds),
            OutputFormat::Table => {
                let tp = TimePrinter::new(Utc::now());
                printer::print_table(out, &creds, &["NAMESPACE", "NAME", "MODIFIED"], |cs| {
                    vec![cs.namespace.clone(), cs.name.clone(), tp.format(&cs.modified)]
                })
            }
        }
    }

    /// Print a single credential set
    pub async fn show_credential(&self, opts: &ShowOptions, out: &mut dyn Write) -> Result<()> {
        let set = self
            .store
            .get_credential_set(&opts.namespace, &opts.name)
            .await?;

        match opts.print.format {
            OutputFormat::Json => printer::print_json(out, &set),
            OutputFormat::Yaml => printer::print_yaml(out, &set),
            OutputFormat::Table => Self::print_credential_table(out, &set, Utc::now()),
        }
    }

    fn print_credential_table(
        out: &mut dyn Write,
        set: &CredentialSet,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let tp = TimePrinter::new(now);

        writeln!(out, "Name: {}", set.name)?;
        writeln!(out, "Namespace: {}", set.namespace)?;
        writeln!(out, "Created: {}", tp.format(&set.created))?;
        writeln!(out, "Modified: {}", tp.format(&set.modified))?;
        writeln!(out)?;

        if !set.labels.is_empty() {
            writeln!(out, "Labels:")?;
            for (k, v) in &set.labels {
                writeln!(out, "  {}: {}", k, v)?;
            }
            writeln!(out)?;
        }

        printer::print_table(
            out,
            &set.credentials,
            &["Name", "Local Source", "Source Type"],
            |c| vec![c.name.clone(), c.source.value.clone(), c.source.key.clone()],
        )
    }

    /// Build a new credential set from a bundle's declared credentials and save it
    pub async fn generate_credentials(
        &self,
        opts: &CredentialOptions,
        out: &mut dyn Write,
    ) -> Result<()> {
        let bundle = self.resolver.resolve(&opts.bundle).await?;

        let name = if opts.name.is_empty() {
            bundle.name.clone()
        } else {
            opts.name.clone()
        };
        let gen_opts = GenerateOptions {
            name,
            namespace: opts.namespace.clone(),
            labels: opts.parse_labels()?,
            silent: opts.silent,
            credentials: bundle.credentials.clone(),
        };

        writeln!(
            out,
            "Generating new credential {} from bundle {}",
            gen_opts.name, bundle.name
        )?;
        writeln!(
            out,
            "==> {} credentials required for bundle {}",
            gen_opts.credentials.len(),
            bundle.name
        )?;

        let mut set = self
            .generator
            .generate(&gen_opts)
            .map_err(|e| CredentialError::generation("unable to generate credentials", e))?;

        set.created = Utc::now();
        set.modified = set.created;

        self.store
            .upsert_credential_set(&set)
            .await
            .map_err(|e| CredentialError::persist("unable to save credentials", e))?;

        info!("Generated credential set {} from bundle {}", set.key(), bundle.name);
        Ok(())
    }

    /// Edit a credential set in the operator's editor
    pub async fn edit_credential(&self, opts: &EditOptions) -> Result<()> {
        let original = self
            .store
            .get_credential_set(&opts.namespace, &opts.name)
            .await?;

        let contents = encoding::marshal(DocumentFormat::Yaml, &original).map_err(|e| {
            CredentialError::SerializeError {
                context: "unable to load credentials".to_string(),
                message: e.to_string(),
            }
        })?;

        let file_name = format!("credset-{}.yaml", original.name);
        let output = self
            .editor
            .edit(&file_name, &contents)
            .await
            .map_err(|e| {
                let message = match e {
                    CredentialError::EditorError { message, .. } => message,
                    other => other.to_string(),
                };
                CredentialError::EditorError {
                    context: "unable to open editor to edit credentials".to_string(),
                    message,
                }
            })?;

        let mut edited: CredentialSet =
            encoding::unmarshal(DocumentFormat::Yaml, &output).map_err(|e| {
                CredentialError::DeserializeError {
                    context: "unable to process credentials".to_string(),
                    message: e.to_string(),
                }
            })?;

        if edited.name != original.name || edited.namespace != original.namespace {
            return Err(CredentialError::ValidationError(format!(
                "credentials are invalid: cannot rename {} while editing",
                original.key()
            )));
        }

        edited.created = original.created;
        self.store
            .validate(&edited)
            .map_err(|e| CredentialError::ValidationError(format!("credentials are invalid: {}", e)))?;

        edited.modified = original.modified;
        edited.touch(Utc::now());

        self.store
            .update_credential_set(&edited)
            .await
            .map_err(|e| CredentialError::persist("unable to save credentials", e))?;

        info!("Edited credential set {}", edited.key());
        Ok(())
    }

    /// Create or replace a credential set from a document on disk
    pub async fn apply_credentials(&self, opts: &ApplyOptions) -> Result<()> {
        let namespace = self.namespace_from_file(opts)?;

        let mut creds: CredentialSet = encoding::unmarshal_file(&opts.file).map_err(|e| {
            CredentialError::parse(
                format!("could not load {} as a credential set", opts.file.display()),
                e,
            )
        })?;

        creds.namespace = namespace;
        creds
            .validate()
            .map_err(|e| CredentialError::ValidationError(format!("invalid credential set: {}", e)))?;

        // Upsert replaces any stored set wholesale, so an existing set's
        // creation time is only kept if the document carries it.
        if creds.created == DateTime::<Utc>::default() {
            debug!(
                "Document {} has no created timestamp; {} will be stored without one",
                opts.file.display(),
                creds.key()
            );
        }
        creds.touch(Utc::now());

        self.store
            .validate(&creds)
            .map_err(|e| CredentialError::ValidationError(format!("credential set is invalid: {}", e)))?;

        self.store
            .upsert_credential_set(&creds)
            .await
            .map_err(|e| CredentialError::persist("unable to save credentials", e))?;

        info!("Applied credential set {} from {}", creds.key(), opts.file.display());
        Ok(())
    }

    /// The namespace embedded in the document, falling back to the options
    fn namespace_from_file(&self, opts: &ApplyOptions) -> Result<String> {
        let context = || format!("invalid --file '{}'", opts.file.display());

        let raw: serde_json::Value = encoding::unmarshal_file(&opts.file)
            .map_err(|e| CredentialError::parse(context(), e))?;

        let serde_json::Value::Object(document) = raw else {
            return Err(CredentialError::parse(context(), "document is not a mapping"));
        };

        match document.get("namespace") {
            Some(serde_json::Value::String(ns)) => Ok(ns.clone()),
            Some(_) => Err(CredentialError::ValidationError(
                "invalid namespace specified in file, must be a string".to_string(),
            )),
            None => Ok(opts.namespace.clone()),
        }
    }

    /// Delete a credential set; deleting a missing set succeeds
    pub async fn delete_credential(&self, opts: &DeleteOptions, err: &mut dyn Write) -> Result<()> {
        match self
            .store
            .remove_credential_set(&opts.namespace, &opts.name)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!("Nothing to delete: {}", e);
                if self.config.debug {
                    writeln!(err, "{}", e)?;
                }
                Ok(())
            }
            Err(e) => Err(CredentialError::persist("unable to delete credential set", e)),
        }
    }
}
