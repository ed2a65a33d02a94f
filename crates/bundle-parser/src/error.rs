//! Error types for the bundle parser

use thiserror::Error;

/// Result type alias for bundle parsing
pub type BundleResult<T> = std::result::Result<T, BundleParseError>;

/// Bundle definition errors
#[derive(Error, Debug)]
pub enum BundleParseError {
    #[error("failed to fetch bundle definition: {0}")]
    FetchError(String),

    #[error("not a bundle definition: {0}")]
    InvalidFormat(String),

    #[error("bundle definition is missing {0}")]
    MissingField(String),

    #[error("credential {0} is declared more than once")]
    DuplicateCredential(String),

    #[error("invalid bundle reference: {0}")]
    InvalidUrl(String),

    #[error("invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("unable to read bundle definition: {0}")]
    IoError(#[from] std::io::Error),
}
