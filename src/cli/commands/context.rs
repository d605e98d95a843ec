//! `context`: build a ranked, code-enriched context bundle for a task description.

use std::path::Path;

use crate::config::Settings;
use crate::context::{self, ContextRequest};
use crate::error::Result;
use crate::storage::GraphStore;

#[allow(clippy::too_many_arguments)]
pub fn run(root: &Path, query: &str, max_nodes: usize, max_code_length: usize, listing: bool) -> Result<()> {
    Settings::load(root)?;
    let store = GraphStore::open(&Settings::db_path(root))?;

    let request = ContextRequest {
        query: query.to_string(),
        max_nodes,
        max_code_length,
        ..Default::default()
    };
    let result = context::build(&store, root, &request)?;

    if result.items.is_empty() {
        println!("No matching context found for '{query}'");
        return Ok(());
    }

    if listing {
        println!("{}", context::render_listing(&result));
    } else {
        println!("{}", context::render_document(&result));
    }

    Ok(())
}
