//! `semantic`: natural-language similarity search over names/signatures/docs.

use std::path::Path;

use crate::config::Settings;
use crate::error::Result;
use crate::query::QueryEngine;
use crate::storage::GraphStore;

pub fn run(root: &Path, query: &str, limit: usize) -> Result<()> {
    Settings::load(root)?;
    let store = GraphStore::open(&Settings::db_path(root))?;
    let engine = QueryEngine::new(&store);

    let hits = engine.semantic_search(query, limit)?;
    if hits.is_empty() {
        println!("No semantic matches for '{query}'");
        return Ok(());
    }

    for (node, score) in hits {
        println!(
            "{score:.3}  {:<10} {:<40} {}:{}",
            node.kind.as_str(),
            node.qualified_name,
            node.file_path,
            node.range.start_line
        );
    }

    Ok(())
}
