//! `sync`: reconcile the store against the current state of the tree.

use std::path::Path;

use crate::config::Settings;
use crate::error::Result;
use crate::indexer;
use crate::storage::GraphStore;

pub fn run(root: &Path, quiet: bool) -> Result<()> {
    let settings = Settings::load(root)?;
    let mut store = GraphStore::open(&Settings::db_path(root))?;

    let report = indexer::sync(&mut store, root, &settings)?;

    if !quiet {
        println!(
            "{} added, {} updated, {} removed, {} unchanged",
            report.added, report.updated, report.removed, report.unchanged
        );
        for (path, message) in &report.errors {
            eprintln!("error: {}: {message}", path.display());
        }
    }

    Ok(())
}
