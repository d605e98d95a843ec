//! `init`: create the `.codexray` storage directory and config file.

use std::path::Path;

use crate::config::Settings;
use crate::error::Result;
use crate::storage::GraphStore;

pub fn run(root: &Path, also_index: bool) -> Result<()> {
    let settings = Settings::default();
    settings.save(root)?;

    // Touch the database file so `status`/queries against a freshly
    // initialized-but-unindexed root see an empty, not missing, store.
    GraphStore::open(&Settings::db_path(root))?;

    append_ignore_entry(root);

    println!("Initialized .codexray/ in {}", root.display());

    if also_index {
        let report = super::index::run(root, false, true)?;
        println!(
            "Indexed {} file(s): {} symbol(s), {} edge(s)",
            report.files_indexed, report.symbols, report.edges
        );
    }

    Ok(())
}

fn append_ignore_entry(root: &Path) {
    let ignore_path = root.join(".gitignore");
    let entry = ".codexray/";

    let existing = std::fs::read_to_string(&ignore_path).unwrap_or_default();
    if existing.lines().any(|l| l.trim() == entry) {
        return;
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(entry);
    content.push('\n');
    let _ = std::fs::write(&ignore_path, content);
}
