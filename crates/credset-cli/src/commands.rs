//! Wires the credential manager to the command line

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use credset_core::{
    ApplyOptions, BundleActionOptions, CredentialManager, CredentialOptions, DefinitionResolver,
    DeleteOptions, EditOptions, ExternalEditor, FileStorage, ListOptions, ManagerConfig,
    PrintOptions, Settings, SettingsManager, ShowOptions, Storage, StorageCredentialStore,
    TerminalPrompter,
};

use crate::cli::{Cli, Command, NamespaceArg, OutputArg};

/// A manager backed by the on-disk store, plus the settings used to fill in defaults
pub struct App {
    manager: CredentialManager,
    settings: Settings,
}

impl App {
    /// Open the store and load settings from the data directory
    pub async fn init(
        data_dir: Option<PathBuf>,
        debug: bool,
        editor_timeout: Option<u64>,
    ) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => FileStorage::default_dir()?,
        };
        debug!("Using data directory {:?}", data_dir);

        let settings = SettingsManager::new(&data_dir).get().clone();

        let storage = FileStorage::open(data_dir.clone())
            .await
            .with_context(|| format!("unable to open credential store in {}", data_dir.display()))?;
        debug!("Credential store backend: {}", storage.backend_name());
        let store =
            StorageCredentialStore::with_source_kinds(Arc::new(storage), settings.source_kinds.clone());

        let timeout = editor_timeout
            .map(Duration::from_secs)
            .or_else(|| settings.editor_timeout());
        let editor = ExternalEditor::from_env(settings.editor.as_deref()).with_timeout(timeout);
        debug!("Editor command: {}", editor.command());

        let config = ManagerConfig {
            debug: debug || settings.debug,
        };

        let manager = CredentialManager::new(
            Arc::new(store),
            Arc::new(DefinitionResolver::new()),
            Arc::new(editor),
            Arc::new(TerminalPrompter::new()),
            config,
        );

        Ok(Self { manager, settings })
    }

    fn namespace(&self, arg: &NamespaceArg) -> String {
        arg.namespace
            .clone()
            .unwrap_or_else(|| self.settings.default_namespace.clone())
    }

    fn print_options(&self, arg: &OutputArg) -> PrintOptions {
        PrintOptions::new(arg.output.clone().unwrap_or_else(|| self.settings.output.clone()))
    }

    /// Validate the command's options and run it
    pub async fn execute(
        &self,
        command: Command,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<()> {
        match command {
            Command::List(args) => {
                let mut opts = ListOptions {
                    print: self.print_options(&args.output),
                    namespace: self.namespace(&args.namespace),
                    all_namespaces: args.all_namespaces,
                    name: args.name,
                    labels: args.labels,
                };
                opts.validate()?;
                self.manager.print_credentials(&opts, out).await?;
            }
            Command::Show(args) => {
                let mut opts = ShowOptions {
                    print: self.print_options(&args.output),
                    namespace: self.namespace(&args.namespace),
                    ..Default::default()
                };
                opts.validate(&args.names)?;
                self.manager.show_credential(&opts, out).await?;
            }
            Command::Generate(args) => {
                let mut opts = CredentialOptions {
                    bundle: BundleActionOptions {
                        file: args.file,
                        reference: args.reference,
                    },
                    namespace: self.namespace(&args.namespace),
                    silent: args.silent,
                    labels: args.labels,
                    ..Default::default()
                };
                opts.validate(&args.names)?;
                self.manager.generate_credentials(&opts, out).await?;
            }
            Command::Edit(args) => {
                let mut opts = EditOptions {
                    namespace: self.namespace(&args.namespace),
                    ..Default::default()
                };
                opts.validate(&args.names)?;
                self.manager.edit_credential(&opts).await?;
            }
            Command::Apply(args) => {
                let mut opts = ApplyOptions {
                    namespace: self.namespace(&args.namespace),
                    ..Default::default()
                };
                opts.validate(&args.files)?;
                self.manager.apply_credentials(&opts).await?;
            }
            Command::Delete(args) => {
                let mut opts = DeleteOptions {
                    namespace: self.namespace(&args.namespace),
                    ..Default::default()
                };
                opts.validate(&args.names)?;
                self.manager.delete_credential(&opts, err).await?;
            }
        }

        out.flush()?;
        Ok(())
    }
}

/// Run a parsed command line against stdout and stderr
pub async fn run(cli: Cli) -> Result<()> {
    let app = App::init(cli.data_dir, cli.debug, cli.editor_timeout).await?;
    app.execute(cli.command, &mut std::io::stdout(), &mut std::io::stderr())
        .await
}
