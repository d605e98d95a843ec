//! Core identifiers and small value types shared across the engine.
//!
//! Node and edge identifiers are content-derived (SHA-256 of a stable tuple)
//! rather than sequentially assigned, so that re-indexing an unchanged file
//! reproduces byte-identical ids on any machine (see invariant P3).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of hex characters kept from a SHA-256 digest for node/edge ids.
const ID_HEX_LEN: usize = 16;

/// Stable identifier for a [`crate::model::Node`].
///
/// Derived from `(kind, file_path, name, start_line)`. Two extractions of the
/// same symbol - on the same machine or a different one - produce the same id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn compute(kind: NodeKind, file_path: &str, name: &str, start_line: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(kind.as_str().as_bytes());
        hasher.update(b"\0");
        hasher.update(file_path.as_bytes());
        hasher.update(b"\0");
        hasher.update(name.as_bytes());
        hasher.update(b"\0");
        hasher.update(start_line.to_le_bytes());
        Self(hex_prefix(&hasher.finalize(), ID_HEX_LEN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Stable identifier for an [`crate::model::Edge`].
///
/// Derived from `(source_id, "->", target_id, ":", kind)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn compute(source: &NodeId, target: &NodeId, kind: EdgeKind) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source.as_str().as_bytes());
        hasher.update(b"->");
        hasher.update(target.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(kind.as_str().as_bytes());
        Self(hex_prefix(&hasher.finalize(), ID_HEX_LEN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn hex_prefix(digest: &[u8], hex_len: usize) -> String {
    let bytes_needed = hex_len.div_ceil(2);
    let mut s = String::with_capacity(hex_len);
    for byte in &digest[..bytes_needed] {
        s.push_str(&format!("{byte:02x}"));
    }
    s.truncate(hex_len);
    s
}

/// The closed set of symbol kinds the extractor can produce.
///
/// Modeled as an exhaustive enum in memory; persisted as text at the storage
/// boundary so the schema stays forward-compatible with kinds added later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Function,
    Method,
    Class,
    Interface,
    Type,
    Enum,
    Variable,
    Constant,
    Module,
    Namespace,
    Struct,
    Trait,
    Component,
    Hook,
    Decorator,
    Property,
    Route,
    Middleware,
    Test,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Type => "type",
            Self::Enum => "enum",
            Self::Variable => "variable",
            Self::Constant => "constant",
            Self::Module => "module",
            Self::Namespace => "namespace",
            Self::Struct => "struct",
            Self::Trait => "trait",
            Self::Component => "component",
            Self::Hook => "hook",
            Self::Decorator => "decorator",
            Self::Property => "property",
            Self::Route => "route",
            Self::Middleware => "middleware",
            Self::Test => "test",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Some(match s {
            "function" => Self::Function,
            "method" => Self::Method,
            "class" => Self::Class,
            "interface" => Self::Interface,
            "type" => Self::Type,
            "enum" => Self::Enum,
            "variable" => Self::Variable,
            "constant" => Self::Constant,
            "module" => Self::Module,
            "namespace" => Self::Namespace,
            "struct" => Self::Struct,
            "trait" => Self::Trait,
            "component" => Self::Component,
            "hook" => Self::Hook,
            "decorator" => Self::Decorator,
            "property" => Self::Property,
            "route" => Self::Route,
            "middleware" => Self::Middleware,
            "test" => Self::Test,
            _ => return None,
        })
    }

    pub const ALL: [NodeKind; 19] = [
        Self::Function,
        Self::Method,
        Self::Class,
        Self::Interface,
        Self::Type,
        Self::Enum,
        Self::Variable,
        Self::Constant,
        Self::Module,
        Self::Namespace,
        Self::Struct,
        Self::Trait,
        Self::Component,
        Self::Hook,
        Self::Decorator,
        Self::Property,
        Self::Route,
        Self::Middleware,
        Self::Test,
    ];
}

/// The closed set of relationship kinds between nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Calls,
    Imports,
    Extends,
    Implements,
    ReturnsType,
    UsesType,
    HasMethod,
    HasProperty,
    Contains,
    Exports,
    Renders,
    Decorates,
    Overrides,
    Tests,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calls => "calls",
            Self::Imports => "imports",
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::ReturnsType => "returns_type",
            Self::UsesType => "uses_type",
            Self::HasMethod => "has_method",
            Self::HasProperty => "has_property",
            Self::Contains => "contains",
            Self::Exports => "exports",
            Self::Renders => "renders",
            Self::Decorates => "decorates",
            Self::Overrides => "overrides",
            Self::Tests => "tests",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Some(match s {
            "calls" => Self::Calls,
            "imports" => Self::Imports,
            "extends" => Self::Extends,
            "implements" => Self::Implements,
            "returns_type" => Self::ReturnsType,
            "uses_type" => Self::UsesType,
            "has_method" => Self::HasMethod,
            "has_property" => Self::HasProperty,
            "contains" => Self::Contains,
            "exports" => Self::Exports,
            "renders" => Self::Renders,
            "decorates" => Self::Decorates,
            "overrides" => Self::Overrides,
            "tests" => Self::Tests,
            _ => return None,
        })
    }

    /// Edge kinds walked by impact-radius (reverse dependency) traversal.
    pub const IMPACT_KINDS: [EdgeKind; 5] = [
        Self::Calls,
        Self::Imports,
        Self::Extends,
        Self::Implements,
        Self::UsesType,
    ];

    /// Edge kinds that can participate in a reported cycle.
    pub const CYCLE_KINDS: [EdgeKind; 4] =
        [Self::Imports, Self::Calls, Self::Extends, Self::Implements];

    /// Every edge kind, unrestricted - used where traversal should not
    /// privilege any particular relationship (e.g. shortest path).
    pub const ALL: [EdgeKind; 14] = [
        Self::Calls,
        Self::Imports,
        Self::Extends,
        Self::Implements,
        Self::ReturnsType,
        Self::UsesType,
        Self::HasMethod,
        Self::HasProperty,
        Self::Contains,
        Self::Exports,
        Self::Renders,
        Self::Decorates,
        Self::Overrides,
        Self::Tests,
    ];

    /// Edge kinds counted as "has a dependent/user" for dead-code analysis.
    pub const DEAD_CODE_BLOCKING_KINDS: [EdgeKind; 5] = [
        Self::Calls,
        Self::Imports,
        Self::Extends,
        Self::Implements,
        Self::UsesType,
    ];

    /// Edge kinds treated as containment/membership for `get_children`.
    pub const CONTAINMENT_KINDS: [EdgeKind; 3] =
        [Self::HasMethod, Self::HasProperty, Self::Contains];
}

/// A 1-based, inclusive source line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start_line: u32,
    pub end_line: u32,
}

impl LineRange {
    pub fn new(start_line: u32, end_line: u32) -> Self {
        debug_assert!(start_line <= end_line);
        Self {
            start_line,
            end_line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_is_deterministic() {
        let a = NodeId::compute(NodeKind::Function, "src/a.ts", "caller", 3);
        let b = NodeId::compute(NodeKind::Function, "src/a.ts", "caller", 3);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), ID_HEX_LEN);
    }

    #[test]
    fn node_id_changes_with_any_tuple_field() {
        let base = NodeId::compute(NodeKind::Function, "src/a.ts", "caller", 3);
        assert_ne!(base, NodeId::compute(NodeKind::Method, "src/a.ts", "caller", 3));
        assert_ne!(base, NodeId::compute(NodeKind::Function, "src/b.ts", "caller", 3));
        assert_ne!(base, NodeId::compute(NodeKind::Function, "src/a.ts", "callee", 3));
        assert_ne!(base, NodeId::compute(NodeKind::Function, "src/a.ts", "caller", 4));
    }

    #[test]
    fn edge_id_is_deterministic() {
        let source = NodeId::compute(NodeKind::Function, "src/a.ts", "caller", 3);
        let target = NodeId::compute(NodeKind::Function, "src/a.ts", "callee", 10);
        let a = EdgeId::compute(&source, &target, EdgeKind::Calls);
        let b = EdgeId::compute(&source, &target, EdgeKind::Calls);
        assert_eq!(a, b);
        assert_ne!(a, EdgeId::compute(&target, &source, EdgeKind::Calls));
    }

    #[test]
    fn node_kind_round_trips_through_str() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_str_opt(kind.as_str()), Some(kind));
        }
    }
}
