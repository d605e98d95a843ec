//! `reset`: delete all persisted data and reinitialize an empty store.

use std::path::Path;

use crate::config::Settings;
use crate::error::Result;
use crate::storage::GraphStore;

pub fn run(root: &Path) -> Result<()> {
    let store = GraphStore::open(&Settings::db_path(root))?;
    store.reset()?;
    store.vacuum()?;
    println!("Reset store at {}", Settings::db_path(root).display());
    Ok(())
}
