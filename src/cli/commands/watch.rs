//! `watch`: observe the tree and keep the store in sync until interrupted.

use std::path::Path;

use crate::config::Settings;
use crate::error::Result;
use crate::storage::GraphStore;
use crate::watcher::{self, WatchEvent};

pub fn run(root: &Path) -> Result<()> {
    let settings = Settings::load(root)?;
    let mut store = GraphStore::open(&Settings::db_path(root))?;

    println!("Watching {} (Ctrl-C to stop)", root.display());

    watcher::watch(&mut store, root, &settings, |event| match event {
        WatchEvent::Reindexed { path } => println!("reindexed {}", path.display()),
        WatchEvent::Removed { path } => println!("removed   {}", path.display()),
        WatchEvent::Error { path, message } => eprintln!("error     {}: {message}", path.display()),
    })
}
