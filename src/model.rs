//! The node/edge/file record schema every language extraction is lowered into.

use crate::types::{EdgeId, EdgeKind, LineRange, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

const MAX_SIGNATURE_LEN: usize = 300;
const MAX_DOCSTRING_LEN: usize = 500;

/// A named program construct extracted from source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: String,
    pub qualified_name: String,
    pub file_path: String,
    pub range: LineRange,
    pub language: String,
    pub signature: Option<String>,
    pub docstring: Option<String>,
    pub exported: bool,
    pub complexity: u8,
    pub metadata: Option<Value>,
}

impl Node {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: NodeKind,
        name: impl Into<String>,
        file_path: impl Into<String>,
        range: LineRange,
        language: impl Into<String>,
        exported: bool,
        complexity: u8,
    ) -> Self {
        let name = name.into();
        let file_path = file_path.into();
        let id = NodeId::compute(kind, &file_path, &name, range.start_line);
        let qualified_name = qualified_name_for(&file_path, &name, kind);
        Self {
            id,
            kind,
            name,
            qualified_name,
            file_path,
            range,
            language: language.into(),
            signature: None,
            docstring: None,
            exported,
            complexity: complexity.clamp(1, 100),
            metadata: None,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        let mut s: String = signature.into();
        truncate_at_char_boundary(&mut s, MAX_SIGNATURE_LEN);
        self.signature = Some(s);
        self
    }

    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        let mut s: String = docstring.into();
        truncate_at_char_boundary(&mut s, MAX_DOCSTRING_LEN);
        self.docstring = Some(s);
        self
    }
}

fn truncate_at_char_boundary(s: &mut String, max_len: usize) {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len).collect();
        *s = truncated;
    }
}

/// Invariant 3: qualified name is deterministic from file path + name + kind.
///
/// Last three path segments (extension stripped), with entry-point stems
/// `{index, main, mod}` dropped only when they are the final segment, joined
/// by `.` with the symbol name.
pub fn qualified_name_for(file_path: &str, name: &str, _kind: NodeKind) -> String {
    let path = Path::new(file_path);
    let mut segments: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if let Some(last) = segments.last_mut() {
        if let Some(stem) = Path::new(last.as_str()).file_stem() {
            *last = stem.to_string_lossy().into_owned();
        }
    }

    const ENTRY_STEMS: [&str; 3] = ["index", "main", "mod"];
    if segments
        .last()
        .is_some_and(|s| ENTRY_STEMS.contains(&s.as_str()))
        && segments.len() > 1
    {
        segments.pop();
    }

    let tail_start = segments.len().saturating_sub(3);
    let tail = &segments[tail_start..];

    let mut qualified = tail.join(".");
    if !qualified.is_empty() {
        qualified.push('.');
    }
    qualified.push_str(name);
    qualified
}

/// A directed relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    pub metadata: Option<Value>,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        let id = EdgeId::compute(&source, &target, kind);
        Self {
            id,
            source,
            target,
            kind,
            metadata: None,
        }
    }
}

/// A single source file previously seen by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub hash: String,
    pub language: Option<String>,
    pub indexed_at: u64,
    pub symbol_count: u32,
    pub line_count: u32,
}

/// An extracted reference whose target is only known by textual name until
/// the [`crate::resolver::Resolver`] runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub source_id: NodeId,
    pub referenced_name: String,
    pub kind: EdgeKind,
    pub file_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_drops_entry_point_stem() {
        assert_eq!(
            qualified_name_for("src/routes/index.ts", "handler", NodeKind::Function),
            "src.routes.handler"
        );
    }

    #[test]
    fn qualified_name_keeps_non_terminal_index_segment() {
        assert_eq!(
            qualified_name_for("src/index/util.ts", "helper", NodeKind::Function),
            "src.index.util.helper"
        );
    }

    #[test]
    fn qualified_name_caps_at_three_segments() {
        assert_eq!(
            qualified_name_for("a/b/c/d/file.rs", "thing", NodeKind::Struct),
            "c.d.file.thing"
        );
    }

    #[test]
    fn qualified_name_strips_extension() {
        assert_eq!(
            qualified_name_for("auth.py", "login", NodeKind::Function),
            "auth.login"
        );
    }

    #[test]
    fn node_signature_is_capped() {
        let long = "x".repeat(400);
        let node = Node::new(
            NodeKind::Function,
            "f",
            "a.rs",
            LineRange::new(1, 2),
            "rust",
            true,
            1,
        )
        .with_signature(long);
        assert_eq!(node.signature.unwrap().chars().count(), 300);
    }
}
