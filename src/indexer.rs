//! Full and incremental indexing (§4.8): walks the project tree, extracts
//! symbols file by file, resolves textual references into edges once every
//! file's nodes are in the store, and rebuilds the semantic index.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::config::Settings;
use crate::error::Result;
use crate::model::{FileRecord, UnresolvedReference};
use crate::parsing::{self, language_for_extension};
use crate::resolver;
use crate::storage::GraphStore;
use crate::utils::get_utc_timestamp;
use crate::walker::FileWalker;

#[derive(Debug, Default)]
pub struct IndexReport {
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub symbols: usize,
    pub edges: usize,
    pub errors: Vec<(PathBuf, String)>,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub errors: Vec<(PathBuf, String)>,
}

/// Index every eligible file under `root`. Unless `force`, a file whose
/// content hash matches its stored record is skipped.
pub fn full_index(store: &mut GraphStore, root: &Path, settings: &Settings, force: bool) -> Result<IndexReport> {
    let mut report = IndexReport::default();
    let mut unresolved: Vec<UnresolvedReference> = Vec::new();
    let files = FileWalker::new(settings).walk(root);

    for path in &files {
        let relative = relative_path_string(root, path);
        let content = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                report.errors.push((path.clone(), e.to_string()));
                continue;
            }
        };
        let hash = hash_bytes(&content);

        if !force {
            if let Ok(Some(existing)) = store.get_file(&relative) {
                if existing.hash == hash {
                    report.files_skipped += 1;
                    continue;
                }
            }
        }

        if let Err(e) = store.delete_edges_by_file(&relative) {
            report.errors.push((path.clone(), e.to_string()));
            continue;
        }
        if let Err(e) = store.delete_nodes_by_file(&relative) {
            report.errors.push((path.clone(), e.to_string()));
            continue;
        }

        match index_content(store, path, &relative, &content, hash) {
            Ok(outcome) => {
                report.files_indexed += 1;
                report.symbols += outcome.symbol_count;
                report.edges += outcome.edge_count;
                unresolved.extend(outcome.unresolved);
            }
            Err(e) => report.errors.push((path.clone(), e.to_string())),
        }
    }

    let resolved = resolver::resolve(store, &unresolved)?;
    for edge in &resolved {
        store.upsert_edge(edge)?;
    }
    report.edges += resolved.len();

    store.rebuild_semantic_index()?;
    Ok(report)
}

/// Reconcile the store against the current state of `root`: remove files
/// that disappeared, skip unchanged files by content hash, and re-extract
/// everything else.
pub fn sync(store: &mut GraphStore, root: &Path, settings: &Settings) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    let current_files = FileWalker::new(settings).walk(root);
    let current_paths: std::collections::HashSet<String> = current_files
        .iter()
        .map(|p| relative_path_string(root, p))
        .collect();

    for existing in store.get_file_tree()? {
        if !current_paths.contains(&existing.path) {
            store.delete_edges_by_file(&existing.path)?;
            store.delete_nodes_by_file(&existing.path)?;
            store.delete_file(&existing.path)?;
            report.removed += 1;
        }
    }

    let mut unresolved: Vec<UnresolvedReference> = Vec::new();
    let mut changed = false;

    for path in &current_files {
        let relative = relative_path_string(root, path);
        let content = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                report.errors.push((path.clone(), e.to_string()));
                continue;
            }
        };
        let hash = hash_bytes(&content);

        if let Some(existing) = store.get_file(&relative)? {
            if existing.hash == hash {
                report.unchanged += 1;
                continue;
            }
            store.delete_edges_by_file(&relative)?;
            store.delete_nodes_by_file(&relative)?;
            report.updated += 1;
        } else {
            report.added += 1;
        }

        changed = true;
        match index_content(store, path, &relative, &content, hash) {
            Ok(outcome) => unresolved.extend(outcome.unresolved),
            Err(e) => report.errors.push((path.clone(), e.to_string())),
        }
    }

    if changed {
        let resolved = resolver::resolve(store, &unresolved)?;
        for edge in &resolved {
            store.upsert_edge(edge)?;
        }
        store.rebuild_semantic_index()?;
    }

    Ok(report)
}

struct FileOutcome {
    symbol_count: usize,
    edge_count: usize,
    unresolved: Vec<UnresolvedReference>,
}

/// Extract and upsert a single file, for the watcher's per-file reindex.
/// Returns its unresolved references; the caller runs the resolver.
pub fn index_single(store: &mut GraphStore, path: &Path, relative: &str) -> Result<Vec<UnresolvedReference>> {
    let content = std::fs::read(path)?;
    let hash = hash_bytes(&content);
    index_content(store, path, relative, &content, hash).map(|o| o.unresolved)
}

fn index_content(
    store: &mut GraphStore,
    path: &Path,
    relative: &str,
    content: &[u8],
    hash: String,
) -> Result<FileOutcome> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let Some(language) = language_for_extension(extension) else {
        return Ok(FileOutcome {
            symbol_count: 0,
            edge_count: 0,
            unresolved: Vec::new(),
        });
    };

    let source = String::from_utf8_lossy(content);
    let mut parser = parsing::SourceParser::for_language(language)?;
    let tree = parser.parse(path, &source)?;
    let result = parsing::extract(&tree, &source, relative, language);

    for node in &result.nodes {
        store.upsert_node(node)?;
    }
    for edge in &result.edges {
        store.upsert_edge(edge)?;
    }

    let line_count = source.lines().count() as u32;
    store.upsert_file(&FileRecord {
        path: relative.to_string(),
        hash,
        language: Some(language.registry_name().to_string()),
        indexed_at: get_utc_timestamp(),
        symbol_count: result.nodes.len() as u32,
        line_count,
    })?;

    Ok(FileOutcome {
        symbol_count: result.nodes.len(),
        edge_count: result.edges.len(),
        unresolved: result.unresolved,
    })
}

fn hash_bytes(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let digest = hasher.finalize();
    digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

fn relative_path_string(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn full_index_extracts_symbols_and_resolves_calls() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "main.rs",
            "fn helper() {}\nfn main() { helper(); }\n",
        );

        let mut store = GraphStore::open(&dir.path().join("codexray.db")).unwrap();
        let report = full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

        assert_eq!(report.files_indexed, 1);
        assert!(report.symbols >= 2);
        assert!(report.edges >= 1);

        let stats = store.get_stats().unwrap();
        assert_eq!(stats.file_count, 1);
    }

    #[test]
    fn sync_skips_unchanged_and_reindexes_edited_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.rs", "fn a() {}\n");

        let mut store = GraphStore::open(&dir.path().join("codexray.db")).unwrap();
        full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

        let report = sync(&mut store, dir.path(), &Settings::default()).unwrap();
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.added, 0);

        write(&dir, "a.rs", "fn a() {}\nfn b() {}\n");
        let report = sync(&mut store, dir.path(), &Settings::default()).unwrap();
        assert_eq!(report.updated, 1);

        let nodes = store.get_nodes_by_file("a.rs").unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn sync_removes_deleted_files() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "gone.rs", "fn g() {}\n");

        let mut store = GraphStore::open(&dir.path().join("codexray.db")).unwrap();
        full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

        std::fs::remove_file(&path).unwrap();
        let report = sync(&mut store, dir.path(), &Settings::default()).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(store.get_stats().unwrap().file_count, 0);
    }
}
