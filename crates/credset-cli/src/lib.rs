//! # credset-cli
//!
//! Command line front end for credset: argument parsing and dispatch to the
//! credential manager.

pub mod cli;
mod commands;

pub use cli::{Cli, Command};
pub use commands::{run, App};
