//! Storage backends for credential set persistence
//!
//! This module provides two storage backends:
//! 1. JSON file in the user's data directory
//! 2. In-memory (tests and throwaway sessions)

mod file;
mod memory;
mod traits;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use traits::Storage;
