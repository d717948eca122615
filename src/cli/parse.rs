//! CLI parse: clap types for regtree. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// regtree - browse and edit a hierarchical key/value store
#[derive(Parser)]
#[command(name = "regtree")]
#[command(about = "Browse and edit a registry-style hierarchical key/value store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Disable logging entirely
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Populate and print the key tree
    Tree {
        /// Root to show (repeatable); defaults to the configured roots
        #[arg(long = "root")]
        roots: Vec<String>,
        /// Deepest level populated
        #[arg(long)]
        depth: Option<usize>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List the subkeys one level below a key
    Expand {
        /// Qualified key, e.g. HKCU\Software
        key: String,
    },
    /// List the values of a key
    Values {
        key: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Report whether a key (or one of its values) exists
    Exists {
        key: String,
        /// Check this value instead of the key
        #[arg(long)]
        value: Option<String>,
    },
    /// Create a key, confirming before reopening an existing one
    CreateKey { key: String },
    /// Write a text value
    SetValue {
        key: String,
        name: String,
        data: String,
    },
    /// Delete a key without subkeys
    DeleteKey { key: String },
    /// Delete one value
    DeleteValue { key: String, name: String },
    /// Export a key in .reg format
    Export {
        key: String,
        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Include every key below
        #[arg(long, short = 'r')]
        recursive: bool,
    },
    /// Import a .reg file
    Import { file: PathBuf },
}
