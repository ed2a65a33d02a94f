//! Error types for credset-core

use thiserror::Error;

/// Result type alias for credential set operations
pub type Result<T> = std::result::Result<T, CredentialError>;

/// Credential set error types
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("{0}")]
    ValidationError(String),

    #[error("credential set not found: {0}")]
    NotFound(String),

    #[error("{context}: {message}")]
    ParseError { context: String, message: String },

    #[error("{context}: {message}")]
    SerializeError { context: String, message: String },

    #[error("{context}: {message}")]
    DeserializeError { context: String, message: String },

    #[error("{context}: {message}")]
    EditorError { context: String, message: String },

    #[error("{context}: {message}")]
    GenerationError { context: String, message: String },

    #[error("{context}: {source}")]
    PersistError {
        context: String,
        #[source]
        source: Box<CredentialError>,
    },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Bundle error: {0}")]
    BundleError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CredentialError {
    /// Build a not-found error for a (namespace, name) key
    pub fn not_found(namespace: &str, name: &str) -> Self {
        if namespace.is_empty() {
            Self::NotFound(name.to_string())
        } else {
            Self::NotFound(format!("{}/{}", namespace, name))
        }
    }

    /// Whether this error means the referenced set does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub(crate) fn persist(context: impl Into<String>, source: CredentialError) -> Self {
        Self::PersistError {
            context: context.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn parse(context: impl Into<String>, message: impl ToString) -> Self {
        Self::ParseError {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn generation(context: impl Into<String>, message: impl ToString) -> Self {
        Self::GenerationError {
            context: context.into(),
            message: message.to_string(),
        }
    }
}
