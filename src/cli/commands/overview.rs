//! `overview`: summarize the indexed codebase - counts and language breakdown.

use std::collections::HashMap;
use std::path::Path;

use crate::config::Settings;
use crate::error::Result;
use crate::query::QueryEngine;
use crate::storage::GraphStore;

pub fn run(root: &Path) -> Result<()> {
    Settings::load(root)?;
    let store = GraphStore::open(&Settings::db_path(root))?;
    let engine = QueryEngine::new(&store);

    let stats = engine.stats()?;
    let files = engine.file_tree()?;

    println!(
        "{} symbol(s), {} edge(s), {} file(s)",
        stats.node_count, stats.edge_count, stats.file_count
    );

    let mut by_lang: HashMap<String, u32> = HashMap::new();
    for file in &files {
        *by_lang.entry(file.language.clone().unwrap_or_else(|| "unknown".to_string())).or_insert(0) += 1;
    }
    let mut langs: Vec<_> = by_lang.into_iter().collect();
    langs.sort();

    println!();
    println!("by language:");
    for (lang, count) in langs {
        println!("  {lang}: {count} file(s)");
    }

    Ok(())
}
