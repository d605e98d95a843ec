//! Query engine (C9): thin, documented pass-throughs to the graph store,
//! adding depth/limit clamping and the ambiguity-reporting behavior of the
//! error design - a name lookup with candidates spread across more than one
//! file is an [`crate::error::Error::Ambiguous`], not a silent pick.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::Node;
use crate::storage::{GraphStore, ImpactHit, StoreStats};
use crate::types::{EdgeKind, NodeId, NodeKind};

const MAX_LIMIT: usize = 200;
const MAX_DEPTH: u32 = 50;

pub struct QueryEngine<'a> {
    store: &'a GraphStore,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self { store }
    }

    /// Resolve a name to a single node, optionally narrowed by a file-path
    /// substring. Empty result is returned as `Ok(vec![])`, not an error;
    /// more than one candidate in distinct files after narrowing is
    /// [`Error::Ambiguous`].
    pub fn find_symbol(
        &self,
        name: &str,
        kind: Option<NodeKind>,
        file_hint: Option<&str>,
    ) -> Result<Vec<Node>> {
        let mut candidates = self.store.get_nodes_by_name(name, kind)?;
        if let Some(hint) = file_hint {
            candidates.retain(|n| n.file_path.contains(hint));
        }

        let distinct_files: std::collections::HashSet<&str> =
            candidates.iter().map(|n| n.file_path.as_str()).collect();
        if distinct_files.len() > 1 {
            return Err(Error::Ambiguous {
                name: name.to_string(),
                candidates,
            });
        }

        Ok(candidates)
    }

    pub fn search(&self, query: &str, kind: Option<NodeKind>, limit: usize) -> Result<Vec<Node>> {
        self.store.search_nodes(query, kind, clamp_limit(limit))
    }

    pub fn semantic_search(&self, query: &str, limit: usize) -> Result<Vec<(Node, f64)>> {
        self.store.semantic_search(query, clamp_limit(limit))
    }

    pub fn get_node(&self, id: &NodeId) -> Result<Option<Node>> {
        self.store.get_node(id)
    }

    pub fn callers(&self, id: &NodeId, limit: usize) -> Result<Vec<Node>> {
        self.store.get_callers(id, clamp_limit(limit))
    }

    pub fn callees(&self, id: &NodeId, limit: usize) -> Result<Vec<Node>> {
        self.store.get_callees(id, clamp_limit(limit))
    }

    pub fn dependencies(&self, id: &NodeId) -> Result<HashMap<EdgeKind, Vec<Node>>> {
        self.store.get_dependencies(id)
    }

    pub fn dependents(&self, id: &NodeId) -> Result<HashMap<EdgeKind, Vec<Node>>> {
        self.store.get_dependents(id)
    }

    pub fn children(&self, id: &NodeId) -> Result<Vec<Node>> {
        self.store.get_children(id)
    }

    pub fn impact_radius(&self, id: &NodeId, max_depth: u32) -> Result<Vec<ImpactHit>> {
        self.store.get_impact_radius(id, clamp_depth(max_depth))
    }

    pub fn path_between(&self, from: &NodeId, to: &NodeId, max_depth: u32) -> Result<Option<Vec<NodeId>>> {
        self.store.find_path(from, to, clamp_depth(max_depth))
    }

    pub fn circular_dependencies(&self) -> Result<Vec<Vec<NodeId>>> {
        self.store.find_circular_deps()
    }

    pub fn dead_code(&self, kinds: &[NodeKind], exported_only: bool) -> Result<Vec<Node>> {
        self.store.find_dead_code(kinds, exported_only)
    }

    pub fn hotspots(&self, limit: usize) -> Result<Vec<(Node, u32, u32)>> {
        self.store.find_hotspots(clamp_limit(limit))
    }

    pub fn complexity_report(&self, threshold: u8) -> Result<Vec<Node>> {
        self.store.get_complexity_report(threshold)
    }

    pub fn file_tree(&self) -> Result<Vec<crate::model::FileRecord>> {
        self.store.get_file_tree()
    }

    pub fn stats(&self) -> Result<StoreStats> {
        self.store.get_stats()
    }
}

fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_LIMIT)
}

fn clamp_depth(depth: u32) -> u32 {
    depth.clamp(1, MAX_DEPTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node as ModelNode;
    use crate::types::LineRange;
    use tempfile::TempDir;

    fn store_with(nodes: &[ModelNode]) -> (GraphStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = GraphStore::open(&dir.path().join("codexray.db")).unwrap();
        for n in nodes {
            store.upsert_node(n).unwrap();
        }
        (store, dir)
    }

    #[test]
    fn ambiguous_name_across_files_is_reported() {
        let a = ModelNode::new(NodeKind::Function, "run", "src/a.rs", LineRange::new(1, 2), "rust", true, 1);
        let b = ModelNode::new(NodeKind::Function, "run", "src/b.rs", LineRange::new(1, 2), "rust", true, 1);
        let (store, _guard) = store_with(&[a, b]);
        let engine = QueryEngine::new(&store);

        let err = engine.find_symbol("run", None, None).unwrap_err();
        match err {
            Error::Ambiguous { candidates, .. } => assert_eq!(candidates.len(), 2),
            other => panic!("expected Error::Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn file_hint_disambiguates() {
        let a = ModelNode::new(NodeKind::Function, "run", "src/a.rs", LineRange::new(1, 2), "rust", true, 1);
        let b = ModelNode::new(NodeKind::Function, "run", "src/b.rs", LineRange::new(1, 2), "rust", true, 1);
        let (store, _guard) = store_with(&[a, b]);
        let engine = QueryEngine::new(&store);

        let found = engine.find_symbol("run", None, Some("a.rs")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].file_path, "src/a.rs");
    }

    #[test]
    fn unknown_name_yields_empty_not_error() {
        let (store, _guard) = store_with(&[]);
        let engine = QueryEngine::new(&store);
        assert!(engine.find_symbol("nothing", None, None).unwrap().is_empty());
    }

    #[test]
    fn limit_and_depth_are_clamped() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(10_000), MAX_LIMIT);
        assert_eq!(clamp_depth(0), 1);
        assert_eq!(clamp_depth(10_000), MAX_DEPTH);
    }
}
