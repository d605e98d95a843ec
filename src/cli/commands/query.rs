//! `query`: keyword search for a symbol name.

use std::path::Path;

use crate::config::Settings;
use crate::error::Result;
use crate::query::QueryEngine;
use crate::storage::GraphStore;
use crate::types::NodeKind;

pub fn run(root: &Path, query: &str, kind: Option<&str>, limit: usize) -> Result<()> {
    Settings::load(root)?;
    let store = GraphStore::open(&Settings::db_path(root))?;
    let engine = QueryEngine::new(&store);

    let kind = match kind {
        Some(k) => Some(
            NodeKind::from_str_opt(k)
                .ok_or_else(|| crate::error::Error::Config { reason: format!("unknown kind '{k}'") })?,
        ),
        None => None,
    };

    let nodes = engine.search(query, kind, limit)?;
    if nodes.is_empty() {
        println!("No matches for '{query}'");
    } else {
        println!("{}", super::format_nodes(&nodes));
    }

    Ok(())
}
