//! CLI surface (C11): argument parsing plus dispatch to one module per verb.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, HooksAction};

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::Result;
use crate::logging;

fn project_root() -> Result<PathBuf> {
    std::env::current_dir().map_err(Into::into)
}

/// Run the parsed command against `root`, printing to stdout/stderr as each
/// command module does. The caller (`main`) maps the returned `Result` to an
/// exit code.
///
/// Logging is initialized here, from the project's own `.codexray/config.json`
/// `logging` settings when one exists (an uninitialized root - e.g. ahead of
/// `init` itself - falls back to `LoggingConfig::default()`), so every
/// subcommand logs under the project's configured levels rather than a
/// hardcoded default.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let root = project_root()?;
    let logging_config = Settings::load(&root).map(|s| s.logging).unwrap_or_default();
    logging::init_with_config(&logging_config);
    run_in(&cli.command, &root).await
}

async fn run_in(command: &Commands, root: &Path) -> Result<()> {
    match command {
        Commands::Init { index } => commands::init::run(root, *index),
        Commands::Index { force, quiet } => commands::index::run(root, *force, *quiet).map(|_| ()),
        Commands::Sync { quiet } => commands::sync::run(root, *quiet),
        Commands::Watch => commands::watch::run(root),
        Commands::Status => commands::status::run(root),
        Commands::Query { query, kind, limit } => {
            commands::query::run(root, query, kind.as_deref(), *limit)
        }
        Commands::Semantic { query, limit } => commands::semantic::run(root, query, *limit),
        Commands::Context { query, max_nodes, max_code_length, listing } => {
            commands::context::run(root, query, *max_nodes, *max_code_length, *listing)
        }
        Commands::Overview => commands::overview::run(root),
        Commands::Hooks { action } => match action {
            HooksAction::Install => commands::hooks::install(root),
            HooksAction::Remove => commands::hooks::remove(root),
            HooksAction::Status => commands::hooks::status(root),
        },
        Commands::Serve => commands::serve::run(root).await,
        Commands::Reset => commands::reset::run(root),
    }
}
