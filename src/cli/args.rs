//! Command-line argument definitions (C11): a `clap`-derived parser exposing
//! the verbs of §6, one typed argument struct per command.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "codexray")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A local code-intelligence engine for AI coding assistants")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the .codexray storage directory and config file
    Init {
        /// Also run a full index immediately after initializing
        #[arg(long)]
        index: bool,
    },

    /// Index every eligible file under the project root
    Index {
        /// Reindex even if a file's content hash is unchanged
        #[arg(short, long)]
        force: bool,
        /// Suppress the per-run summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Reconcile the store against the current state of the tree
    Sync {
        #[arg(short, long)]
        quiet: bool,
    },

    /// Watch the tree and keep the store in sync until interrupted
    Watch,

    /// Report index freshness: file/symbol counts and last indexed time
    Status,

    /// Keyword search for a symbol name
    Query {
        query: String,
        /// Restrict to this symbol kind (e.g. "function", "struct")
        #[arg(long)]
        kind: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Natural-language similarity search over symbol names/signatures/docs
    Semantic {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Build a ranked, code-enriched context bundle for a task description
    Context {
        query: String,
        #[arg(long, default_value_t = 25)]
        max_nodes: usize,
        #[arg(long, default_value_t = 500)]
        max_code_length: usize,
        /// Print one line per symbol instead of the grouped document view
        #[arg(long)]
        listing: bool,
    },

    /// Summarize the indexed codebase: counts and language breakdown
    Overview,

    /// Manage the git pre-commit hook that keeps the index in sync
    Hooks {
        #[command(subcommand)]
        action: HooksAction,
    },

    /// Start the MCP tool server on stdio
    Serve,

    /// Delete all persisted data and reinitialize an empty store
    Reset,
}

#[derive(Subcommand)]
pub enum HooksAction {
    Install,
    Remove,
    Status,
}
