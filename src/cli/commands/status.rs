//! `status`: index freshness - file/symbol counts and the last indexed time.

use std::path::Path;

use crate::config::Settings;
use crate::error::Result;
use crate::query::QueryEngine;
use crate::storage::GraphStore;

pub fn run(root: &Path) -> Result<()> {
    let settings = Settings::load(root)?;
    let store = GraphStore::open(&Settings::db_path(root))?;
    let engine = QueryEngine::new(&store);

    let stats = engine.stats()?;
    let files = engine.file_tree()?;
    let last_indexed = files.iter().map(|f| f.indexed_at).max();

    println!("project:      {}", settings.project_name);
    println!("root:         {}", root.display());
    println!("files:        {}", stats.file_count);
    println!("symbols:      {}", stats.node_count);
    println!("edges:        {}", stats.edge_count);
    println!(
        "last indexed: {}",
        last_indexed.map(|t| t.to_string()).unwrap_or_else(|| "never".to_string())
    );

    Ok(())
}
