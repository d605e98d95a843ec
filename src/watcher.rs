//! Watch mode (§4.8): observes the tree for add/change/unlink events,
//! debounces per path by 300ms, and keeps the store in sync file by file.
//!
//! Unlike `sync`, a single changed file re-runs the resolver only against
//! its own references rather than rebuilding the whole TF-IDF index -
//! callers that want semantic search kept current should run `sync`
//! periodically alongside `watch`.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::Duration;

use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};

use crate::config::Settings;
use crate::debouncer::Debouncer;
use crate::error::Result;
use crate::parsing::language_for_extension;
use crate::resolver;
use crate::storage::GraphStore;

const DEBOUNCE_MS: u64 = 300;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum WatchEvent {
    Reindexed { path: PathBuf },
    Removed { path: PathBuf },
    Error { path: PathBuf, message: String },
}

/// Block, watching `root` recursively, until the underlying channel closes.
pub fn watch(
    store: &mut GraphStore,
    root: &Path,
    settings: &Settings,
    mut on_event: impl FnMut(WatchEvent),
) -> Result<()> {
    let (tx, rx) = channel::<notify::Result<Event>>();
    let mut watcher: RecommendedWatcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })
    .map_err(|e| crate::error::Error::General(format!("failed to start file watcher: {e}")))?;

    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(|e| crate::error::Error::General(format!("failed to watch '{}': {e}", root.display())))?;

    let mut debouncer = Debouncer::new(DEBOUNCE_MS);
    let excludes = build_excludes(settings);

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) => handle_event(event, &mut debouncer, root, &excludes),
            Ok(Err(e)) => on_event(WatchEvent::Error {
                path: root.to_path_buf(),
                message: e.to_string(),
            }),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }

        for path in debouncer.take_ready() {
            process_path(store, root, &path, &mut on_event);
        }
    }
}

fn build_excludes(settings: &Settings) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in &settings.exclude {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap())
}

fn handle_event(event: Event, debouncer: &mut Debouncer, root: &Path, excludes: &GlobSet) {
    for path in event.paths {
        if !is_tracked(root, &path, excludes) {
            continue;
        }
        match event.kind {
            EventKind::Remove(_) => {
                debouncer.remove(&path);
                debouncer.record(path);
            }
            EventKind::Create(_) | EventKind::Modify(_) => {
                debouncer.record(path);
            }
            _ => {}
        }
    }
}

fn is_tracked(root: &Path, path: &Path, excludes: &GlobSet) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    if excludes.is_match(relative) {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| language_for_extension(ext).is_some())
}

fn process_path(
    store: &mut GraphStore,
    root: &Path,
    path: &Path,
    on_event: &mut impl FnMut(WatchEvent),
) {
    let relative = path
        .strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");

    if let Err(e) = store.delete_edges_by_file(&relative) {
        on_event(WatchEvent::Error { path: path.to_path_buf(), message: e.to_string() });
        return;
    }
    if let Err(e) = store.delete_nodes_by_file(&relative) {
        on_event(WatchEvent::Error { path: path.to_path_buf(), message: e.to_string() });
        return;
    }

    if !path.exists() {
        if let Err(e) = store.delete_file(&relative) {
            on_event(WatchEvent::Error { path: path.to_path_buf(), message: e.to_string() });
            return;
        }
        on_event(WatchEvent::Removed { path: path.to_path_buf() });
        return;
    }

    match crate::indexer::index_single(store, path, &relative) {
        Ok(unresolved) => match resolver::resolve(store, &unresolved) {
            Ok(edges) => {
                for edge in &edges {
                    if let Err(e) = store.upsert_edge(edge) {
                        on_event(WatchEvent::Error {
                            path: path.to_path_buf(),
                            message: e.to_string(),
                        });
                        return;
                    }
                }
                on_event(WatchEvent::Reindexed { path: path.to_path_buf() });
            }
            Err(e) => on_event(WatchEvent::Error { path: path.to_path_buf(), message: e.to_string() }),
        },
        Err(e) => on_event(WatchEvent::Error { path: path.to_path_buf(), message: e.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn untracked_extensions_are_ignored() {
        let excludes = build_excludes(&Settings::default());
        let root = Path::new("/repo");
        assert!(is_tracked(root, Path::new("/repo/src/main.rs"), &excludes));
        assert!(!is_tracked(root, Path::new("/repo/README.md"), &excludes));
    }

    #[test]
    fn default_excludes_skip_vendor_and_build_dirs() {
        let excludes = build_excludes(&Settings::default());
        let root = Path::new("/repo");
        assert!(!is_tracked(root, Path::new("/repo/target/debug/main.rs"), &excludes));
        assert!(!is_tracked(root, Path::new("/repo/node_modules/pkg/index.js"), &excludes));
    }
}
