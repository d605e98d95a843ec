//! Generic symbol extractor (C3). One pre-order walk, table-driven by
//! [`super::node_kinds`], produces every [`Node`], `contains` [`Edge`], and
//! [`UnresolvedReference`] for a file regardless of its language.

use std::sync::OnceLock;

use regex::Regex;
use tree_sitter::{Node as TsNode, Tree};

use crate::model::{Edge, Node, UnresolvedReference};
use crate::types::{EdgeKind, LineRange, NodeId, NodeKind};

use super::language::LanguageId;
use super::node_kinds::{self, LanguageSyntax};

const MAX_COMPLEXITY: u32 = 100;

pub struct ExtractionResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub unresolved: Vec<UnresolvedReference>,
}

struct Extractor<'a> {
    source: &'a str,
    path: &'a str,
    language: LanguageId,
    syntax: &'static LanguageSyntax,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    unresolved: Vec<UnresolvedReference>,
}

/// Walk `tree` for a file at `path` with contents `source`, already known to
/// be `language`.
pub fn extract(tree: &Tree, source: &str, path: &str, language: LanguageId) -> ExtractionResult {
    let mut extractor = Extractor {
        source,
        path,
        language,
        syntax: node_kinds::syntax_for(language),
        nodes: Vec::new(),
        edges: Vec::new(),
        unresolved: Vec::new(),
    };
    extractor.walk(tree.root_node(), None);
    ExtractionResult {
        nodes: extractor.nodes,
        edges: extractor.edges,
        unresolved: extractor.unresolved,
    }
}

impl<'a> Extractor<'a> {
    /// Pre-order walk. `parent` is the last recognized symbol's id, carried
    /// through non-symbol descendants per the containment rule.
    fn walk(&mut self, node: TsNode, parent: Option<NodeId>) {
        let classified = node_kinds::classify(self.syntax, node.kind());

        let recognized = classified.and_then(|kind| self.build_symbol(node, kind));

        let next_parent = if let Some(ref n) = recognized {
            if let Some(parent_id) = parent {
                self.edges
                    .push(Edge::new(parent_id, n.id.clone(), EdgeKind::Contains));
            }
            self.scan_references(node, &n.id);
            let id = n.id.clone();
            self.nodes.push(n);
            Some(id)
        } else {
            parent
        };

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.walk(child, next_parent.clone());
        }
    }

    fn build_symbol(&self, node: TsNode, mut kind: NodeKind) -> Option<Node> {
        let name = self.discover_name(node)?;

        if kind == NodeKind::Function {
            kind = self.refine_function_kind(node, &name);
        }

        let start = node.start_position();
        let end = node.end_position();
        let line_range = LineRange {
            start_line: start.row as u32 + 1,
            end_line: end.row as u32 + 1,
        };

        let slice = self.slice(node);
        let exported = self.is_exported(node, slice);
        let signature = self.extract_signature(slice);
        let docstring = self.extract_docstring(node);
        let complexity = self.compute_complexity(slice).min(255) as u8;

        let mut built = Node::new(
            kind,
            name,
            self.path.to_string(),
            line_range,
            self.language.registry_name().to_string(),
            exported,
            complexity,
        );
        if let Some(sig) = signature {
            built = built.with_signature(sig);
        }
        if let Some(doc) = docstring {
            built = built.with_docstring(doc);
        }
        Some(built)
    }

    /// Refinement rules 1-4, applied in order; the first match wins.
    fn refine_function_kind(&self, node: TsNode, name: &str) -> NodeKind {
        if let Some(parent) = node.parent() {
            if self.syntax.class_body_types.contains(&parent.kind()) {
                return NodeKind::Method;
            }
        }

        let registry_name = self.language.registry_name();
        if (registry_name == "typescript" || registry_name == "javascript")
            && name.chars().next().is_some_and(|c| c.is_uppercase())
        {
            return NodeKind::Component;
        }

        if hook_name_re().is_match(name) {
            return NodeKind::Hook;
        }

        if test_name_re().is_match(name) {
            return NodeKind::Test;
        }

        NodeKind::Function
    }

    /// Prefer named-field children, then any direct named child of the
    /// identifier-like kinds, then search one level deeper.
    fn discover_name(&self, node: TsNode) -> Option<String> {
        for field in ["name", "identifier", "type_identifier", "property_name"] {
            if let Some(child) = node.child_by_field_name(field) {
                return Some(self.slice(child).to_string());
            }
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if matches!(child.kind(), "identifier" | "type_identifier" | "property_identifier") {
                return Some(self.slice(child).to_string());
            }
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            let mut inner_cursor = child.walk();
            for grandchild in child.named_children(&mut inner_cursor) {
                if matches!(
                    grandchild.kind(),
                    "identifier" | "type_identifier" | "property_identifier"
                ) {
                    return Some(self.slice(grandchild).to_string());
                }
            }
        }

        None
    }

    fn is_exported(&self, node: TsNode, slice: &str) -> bool {
        let prefix_len = char_boundary(slice, 20);
        let prefix = &slice[..prefix_len];
        if prefix.starts_with("pub ") || prefix.starts_with("public ") || prefix.starts_with("export ") {
            return true;
        }

        node.parent()
            .is_some_and(|p| p.kind().contains("export") || p.kind() == "visibility_modifier")
    }

    /// From symbol start to the first `{`, trimmed; else up to the first `:`
    /// within 200 chars; else the first line. Capped at 300 chars.
    fn extract_signature(&self, slice: &str) -> Option<String> {
        let candidate = if let Some(idx) = slice.find('{') {
            &slice[..idx]
        } else if let Some(idx) = slice[..char_boundary(slice, 200)].find(':') {
            &slice[..idx]
        } else {
            slice.lines().next().unwrap_or(slice)
        };

        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// The preceding named sibling if comment-like; else a leading
    /// string-expression child (Python/Lua-style docstring idiom).
    fn extract_docstring(&self, node: TsNode) -> Option<String> {
        if let Some(prev) = node.prev_named_sibling() {
            if self.syntax.comment_types.contains(&prev.kind()) {
                return Some(strip_comment_markers(self.slice(prev)));
            }
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "block" || child.kind() == "class_body" {
                let mut inner = child.walk();
                if let Some(first) = child.named_children(&mut inner).next() {
                    if first.kind() == "expression_statement" {
                        let mut expr_cursor = first.walk();
                        if let Some(string_node) =
                            first.named_children(&mut expr_cursor).find(|n| n.kind() == "string")
                        {
                            return Some(self.slice(string_node).trim_matches('"').trim_matches('\'').to_string());
                        }
                    }
                }
                break;
            }
        }

        None
    }

    fn compute_complexity(&self, slice: &str) -> u32 {
        let keyword_hits = complexity_re().find_iter(slice).count() as u32;
        let operator_hits =
            (slice.matches("&&").count() + slice.matches("||").count() + slice.matches('?').count()) as u32;
        (1 + keyword_hits + operator_hits).min(MAX_COMPLEXITY)
    }

    fn scan_references(&mut self, node: TsNode, source_id: &NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if self.syntax.call_types.contains(&current.kind()) {
                if let Some(name) = self.callee_name(current) {
                    self.push_unresolved(source_id, name, EdgeKind::Calls);
                }
            } else if self.syntax.import_types.contains(&current.kind()) {
                if let Some(target) = import_target_re().captures(self.slice(current)) {
                    let module = target
                        .get(1)
                        .or_else(|| target.get(2))
                        .or_else(|| target.get(3))
                        .or_else(|| target.get(4))
                        .map(|m| m.as_str().to_string());
                    if let Some(module) = module {
                        self.push_unresolved(source_id, module, EdgeKind::Imports);
                    }
                }
            } else if self.syntax.heritage_types.contains(&current.kind()) {
                if let Some(name) = self.discover_name(current).or_else(|| self.first_identifier(current)) {
                    let kind = if current.kind().contains("implement") {
                        EdgeKind::Implements
                    } else {
                        EdgeKind::Extends
                    };
                    self.push_unresolved(source_id, name, kind);
                }
            }

            let mut inner = current.walk();
            for child in current.named_children(&mut inner) {
                stack.push(child);
            }
        }
    }

    fn callee_name(&self, node: TsNode) -> Option<String> {
        let callee = node
            .child_by_field_name("function")
            .or_else(|| node.child_by_field_name("name"))
            .or_else(|| node.named_child(0))?;
        let text = self.slice(callee);
        Some(text.rsplit(['.', ':']).next().unwrap_or(text).to_string())
    }

    fn first_identifier(&self, node: TsNode) -> Option<String> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .find(|c| c.kind().contains("identifier"))
            .map(|c| self.slice(c).to_string())
    }

    fn push_unresolved(&mut self, source_id: &NodeId, referenced_name: String, kind: EdgeKind) {
        self.unresolved.push(UnresolvedReference {
            source_id: source_id.clone(),
            referenced_name,
            kind,
            file_path: self.path.to_string(),
        });
    }

    fn slice(&self, node: TsNode) -> &'a str {
        &self.source[node.start_byte()..node.end_byte()]
    }
}

/// Byte offset of the `max_chars`-th character in `slice`, or its length if
/// shorter - always a valid char boundary, unlike a fixed byte count.
fn char_boundary(slice: &str, max_chars: usize) -> usize {
    slice.char_indices().nth(max_chars).map(|(i, _)| i).unwrap_or(slice.len())
}

fn strip_comment_markers(text: &str) -> String {
    text.trim()
        .trim_start_matches("///")
        .trim_start_matches("//!")
        .trim_start_matches("//")
        .trim_start_matches("/**")
        .trim_start_matches("/*!")
        .trim_start_matches("/*")
        .trim_end_matches("*/")
        .trim_start_matches('#')
        .trim()
        .to_string()
}

fn hook_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^use[A-Z]").unwrap())
}

fn test_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(test|it|describe|spec)").unwrap())
}

fn complexity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(if|else|for|while|switch|case|catch|match)\b").unwrap())
}

fn import_target_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"from\s+"([^"]+)"|import\s+"([^"]+)"|require\(\s*"([^"]+)"\s*\)|use\s+([\w:]+)"#)
            .unwrap()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::language;
    use crate::parsing::parser::SourceParser;

    fn extract_source(lang: LanguageId, path: &str, source: &str) -> ExtractionResult {
        let mut parser = SourceParser::for_language(lang).unwrap();
        let tree = parser.parse(std::path::Path::new(path), source).unwrap();
        extract(&tree, source, path, lang)
    }

    #[test]
    fn extracts_a_rust_function_with_a_call_edge() {
        let result = extract_source(
            LanguageId::Rust,
            "src/lib.rs",
            "fn helper() {}\n\npub fn main() {\n    helper();\n}\n",
        );
        assert_eq!(result.nodes.len(), 2);
        let main_fn = result.nodes.iter().find(|n| n.name == "main").unwrap();
        assert!(main_fn.exported);
        assert_eq!(main_fn.kind, NodeKind::Function);
        assert!(result
            .unresolved
            .iter()
            .any(|r| r.referenced_name == "helper" && r.kind == EdgeKind::Calls));
    }

    #[test]
    fn method_inside_impl_block_is_classified_as_method() {
        let result = extract_source(
            LanguageId::Rust,
            "src/lib.rs",
            "struct Foo;\nimpl Foo {\n    fn bar(&self) {}\n}\n",
        );
        let bar = result.nodes.iter().find(|n| n.name == "bar").unwrap();
        assert_eq!(bar.kind, NodeKind::Method);
    }

    #[test]
    fn typescript_capitalized_function_becomes_a_component() {
        let result = extract_source(
            LanguageId::TypeScript,
            "src/App.tsx",
            "function App() {\n  return null;\n}\n",
        );
        let app = result.nodes.iter().find(|n| n.name == "App").unwrap();
        assert_eq!(app.kind, NodeKind::Component);
    }

    #[test]
    fn use_prefixed_function_becomes_a_hook() {
        let result = extract_source(
            LanguageId::JavaScript,
            "src/hooks.js",
            "function useCounter() {\n  return 0;\n}\n",
        );
        let hook = result.nodes.iter().find(|n| n.name == "useCounter").unwrap();
        assert_eq!(hook.kind, NodeKind::Hook);
    }

    #[test]
    fn test_prefixed_function_is_classified_as_test() {
        let result = extract_source(
            LanguageId::Python,
            "tests/test_auth.py",
            "def test_login():\n    pass\n",
        );
        let test_fn = result.nodes.iter().find(|n| n.name == "test_login").unwrap();
        assert_eq!(test_fn.kind, NodeKind::Test);
    }

    #[test]
    fn complexity_counts_branching_keywords_and_operators() {
        let result = extract_source(
            LanguageId::Rust,
            "src/lib.rs",
            "fn branchy(a: i32, b: i32) -> i32 {\n    if a > 0 && b > 0 {\n        a\n    } else {\n        b\n    }\n}\n",
        );
        let branchy = result.nodes.iter().find(|n| n.name == "branchy").unwrap();
        assert!(branchy.complexity >= 3);
    }

    #[test]
    fn contains_edge_links_parent_and_method() {
        let result = extract_source(
            LanguageId::Java,
            "src/Main.java",
            "public class Main {\n    public void run() {}\n}\n",
        );
        let class_node = result.nodes.iter().find(|n| n.kind == NodeKind::Class).unwrap();
        let method_node = result.nodes.iter().find(|n| n.kind == NodeKind::Method).unwrap();
        assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Contains
            && e.source == class_node.id
            && e.target == method_node.id));
    }

    #[test]
    fn doc_comment_is_captured_as_docstring() {
        let result = extract_source(
            LanguageId::Rust,
            "src/lib.rs",
            "/// Adds two numbers.\nfn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n",
        );
        let add = result.nodes.iter().find(|n| n.name == "add").unwrap();
        assert_eq!(add.docstring.as_deref(), Some("Adds two numbers."));
    }

    #[test]
    fn unknown_language_registry_never_panics_on_empty_file() {
        let _ = language::language_for_extension("gd");
    }
}
