//! Command line arguments

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// credset - manage the credential sets bundles run with
#[derive(Parser, Debug)]
#[command(name = "credset")]
#[command(author = "Symbia Labs")]
#[command(version)]
#[command(about = "Manage credential sets: named mappings from bundle credentials to where their values live")]
pub struct Cli {
    /// Print debug logs and report otherwise silent outcomes
    #[arg(long, global = true, env = "CREDSET_DEBUG")]
    pub debug: bool,

    /// Directory holding the credential store and settings
    #[arg(long, global = true, env = "CREDSET_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Stop waiting for the editor after this many seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub editor_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List credential sets
    List(ListArgs),

    /// Show a credential set
    Show(ShowArgs),

    /// Generate a credential set from a bundle's declared credentials
    Generate(GenerateArgs),

    /// Edit a credential set in your editor
    Edit(NameArgs),

    /// Create or update a credential set from a JSON or YAML file
    Apply(ApplyArgs),

    /// Delete a credential set
    Delete(NameArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct NamespaceArg {
    /// Namespace of the credential set (defaults to the global namespace)
    #[arg(short = 'n', long, env = "CREDSET_NAMESPACE")]
    pub namespace: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArg {
    /// Output format: table, json or yaml
    #[arg(short = 'o', long, value_name = "FORMAT")]
    pub output: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub namespace: NamespaceArg,

    /// List credential sets in every namespace
    #[arg(long)]
    pub all_namespaces: bool,

    /// Only list sets whose name contains this value
    #[arg(long, default_value = "")]
    pub name: String,

    /// Only list sets with this label (key=value, repeatable)
    #[arg(short = 'l', long = "label", value_name = "KEY=VALUE")]
    pub labels: Vec<String>,

    #[command(flatten)]
    pub output: OutputArg,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Name of the credential set
    pub names: Vec<String>,

    #[command(flatten)]
    pub namespace: NamespaceArg,

    #[command(flatten)]
    pub output: OutputArg,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Name of the new credential set (defaults to the bundle name)
    pub names: Vec<String>,

    /// Bundle definition file (porter.yaml or bundle.json)
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// URL of a published bundle definition
    #[arg(short = 'r', long)]
    pub reference: Option<String>,

    #[command(flatten)]
    pub namespace: NamespaceArg,

    /// Write placeholder sources instead of prompting
    #[arg(long)]
    pub silent: bool,

    /// Label to apply to the set (key=value, repeatable)
    #[arg(short = 'l', long = "label", value_name = "KEY=VALUE")]
    pub labels: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct NameArgs {
    /// Name of the credential set
    pub names: Vec<String>,

    #[command(flatten)]
    pub namespace: NamespaceArg,
}

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// JSON or YAML credential set document
    pub files: Vec<String>,

    #[command(flatten)]
    pub namespace: NamespaceArg,
}
