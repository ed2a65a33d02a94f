//! # credset-core
//!
//! Core credential set management for credset including:
//! - Credential set model and structural validation
//! - Namespaced credential store over pluggable storage backends
//! - Generation of credential sets from bundle credential requirements
//! - Round-tripping sets through an external editor
//! - Applying externally authored documents with upsert semantics

pub mod bundle;
pub mod credential;
pub mod editor;
pub mod encoding;
pub mod error;
pub mod options;
pub mod printer;
pub mod settings;
pub mod storage;
mod manager;

pub use bundle::{BundleActionOptions, BundleResolver, DefinitionResolver};
pub use credential::{
    CredentialGenerator, CredentialSet, CredentialStore, CredentialStrategy, GenerateOptions,
    Source, SourcePrompter, StorageCredentialStore, TerminalPrompter,
};
pub use editor::{Editor, ExternalEditor};
pub use encoding::{DocumentFormat, EncodingError};
pub use error::{CredentialError, Result};
pub use manager::{CredentialManager, ManagerConfig};
pub use options::{
    ApplyOptions, CredentialOptions, DeleteOptions, EditOptions, ListOptions, PrintOptions,
    ShowOptions,
};
pub use printer::OutputFormat;
pub use settings::{Settings, SettingsManager};
pub use storage::{FileStorage, MemoryStorage, Storage};
