//! Credential sets: model, persistence and generation

mod generator;
mod store;
mod types;

pub use generator::{CredentialGenerator, GenerateOptions, SourcePrompter, TerminalPrompter};
pub use store::{CredentialStore, StorageCredentialStore, DEFAULT_SOURCE_KINDS};
pub use types::*;
