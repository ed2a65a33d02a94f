//! # bundle-parser
//!
//! Bundle definition parser for credset.
//! Reads CNAB `bundle.json` and porter-style `porter.yaml` definitions and
//! exposes the credentials a bundle declares.

mod error;
mod parser;
mod types;

pub use error::{BundleParseError, BundleResult};
pub use parser::BundleParser;
pub use types::*;
