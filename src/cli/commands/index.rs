//! `index`: full index of every eligible file under the project root.

use std::path::Path;

use crate::config::Settings;
use crate::error::Result;
use crate::indexer::{self, IndexReport};
use crate::storage::GraphStore;

pub fn run(root: &Path, force: bool, quiet: bool) -> Result<IndexReport> {
    let settings = Settings::load(root)?;
    let mut store = GraphStore::open(&Settings::db_path(root))?;

    let report = indexer::full_index(&mut store, root, &settings, force)?;

    if !quiet {
        println!(
            "{} indexed, {} skipped, {} symbol(s), {} edge(s)",
            report.files_indexed, report.files_skipped, report.symbols, report.edges
        );
        for (path, message) in &report.errors {
            eprintln!("error: {}: {message}", path.display());
        }
    }

    Ok(report)
}
