//! Reference resolver (C7): turns the extractor's textual unresolved
//! references into concrete edges by scoring name-matched candidates.

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::model::{Edge, UnresolvedReference};
use crate::storage::GraphStore;
use crate::types::{EdgeKind, NodeKind};

const MAX_CANDIDATES: usize = 10;

/// Resolve `references` against the store, returning deduplicated edges
/// ready to upsert. Best-effort: references with no candidates are dropped.
pub fn resolve(store: &GraphStore, references: &[UnresolvedReference]) -> Result<Vec<Edge>> {
    let mut seen_edge_ids = HashSet::new();
    let mut edges = Vec::new();

    for reference in references {
        let candidates = store.get_nodes_by_name(&reference.referenced_name, None)?;
        let candidates: Vec<_> = candidates.into_iter().take(MAX_CANDIDATES).collect();
        if candidates.is_empty() {
            continue;
        }

        let Some(best) = pick_best(reference, &candidates) else {
            continue;
        };

        if best.id == reference.source_id {
            continue;
        }

        let edge = Edge::new(reference.source_id.clone(), best.id.clone(), reference.kind);
        if seen_edge_ids.insert(edge.id.clone()) {
            edges.push(edge);
        }
    }

    Ok(edges)
}

fn pick_best<'a>(
    reference: &UnresolvedReference,
    candidates: &'a [crate::model::Node],
) -> Option<&'a crate::model::Node> {
    candidates
        .iter()
        .map(|c| (c, score(reference, c)))
        .max_by(|(a_node, a_score), (b_node, b_score)| {
            a_score
                .partial_cmp(b_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    // Tie-break on shorter file path (closer to repo root).
                    b_node.file_path.len().cmp(&a_node.file_path.len())
                })
        })
        .map(|(node, _)| node)
}

fn score(reference: &UnresolvedReference, candidate: &crate::model::Node) -> f64 {
    let mut s = 0.0;

    if candidate.name == reference.referenced_name {
        s += 10.0;
    }

    let ref_path = Path::new(&reference.file_path);
    let cand_path = Path::new(&candidate.file_path);

    if candidate.file_path == reference.file_path {
        s += 8.0;
    } else if ref_path.parent() == cand_path.parent() {
        s += 5.0;
    } else {
        s += shared_prefix_score(ref_path, cand_path);
    }

    if candidate.exported {
        s += 3.0;
    }

    if reference.kind == EdgeKind::Imports
        && matches!(candidate.kind, NodeKind::Class | NodeKind::Interface | NodeKind::Namespace)
    {
        s += 2.0;
    }

    s
}

/// Shared path-prefix segments, capped at +3.
fn shared_prefix_score(a: &Path, b: &Path) -> f64 {
    let shared = a
        .components()
        .zip(b.components())
        .take_while(|(x, y)| x == y)
        .count();
    (shared as f64).min(3.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;
    use crate::storage::GraphStore;
    use crate::types::LineRange;

    fn store_with(nodes: &[Node]) -> (GraphStore, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = GraphStore::open(&dir.path().join("codexray.db")).unwrap();
        for n in nodes {
            store.upsert_node(n).unwrap();
        }
        (store, dir)
    }

    #[test]
    fn prefers_same_file_candidate_over_distant_one() {
        let caller = Node::new(NodeKind::Function, "caller", "src/a.rs", LineRange::new(1, 2), "rust", true, 1);
        let near = Node::new(NodeKind::Function, "helper", "src/a.rs", LineRange::new(10, 12), "rust", false, 1);
        let far = Node::new(NodeKind::Function, "helper", "lib/other.rs", LineRange::new(1, 2), "rust", true, 1);
        let (store, _guard) = store_with(&[caller.clone(), near.clone(), far.clone()]);

        let reference = UnresolvedReference {
            source_id: caller.id.clone(),
            referenced_name: "helper".to_string(),
            kind: EdgeKind::Calls,
            file_path: "src/a.rs".to_string(),
        };

        let edges = resolve(&store, &[reference]).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target, near.id);
    }

    #[test]
    fn self_reference_is_dropped() {
        let solo = Node::new(NodeKind::Function, "solo", "src/a.rs", LineRange::new(1, 2), "rust", true, 1);
        let (store, _guard) = store_with(&[solo.clone()]);
        let reference = UnresolvedReference {
            source_id: solo.id.clone(),
            referenced_name: "solo".to_string(),
            kind: EdgeKind::Calls,
            file_path: "src/a.rs".to_string(),
        };
        assert!(resolve(&store, &[reference]).unwrap().is_empty());
    }

    #[test]
    fn reference_with_no_candidates_is_silently_dropped() {
        let caller = Node::new(NodeKind::Function, "caller", "src/a.rs", LineRange::new(1, 2), "rust", true, 1);
        let (store, _guard) = store_with(&[caller.clone()]);
        let reference = UnresolvedReference {
            source_id: caller.id.clone(),
            referenced_name: "nonexistent".to_string(),
            kind: EdgeKind::Calls,
            file_path: "src/a.rs".to_string(),
        };
        assert!(resolve(&store, &[reference]).unwrap().is_empty());
    }
}
