//! Context builder (C10): turns a natural-language task query into a ranked,
//! enriched bundle of symbols an assistant can read straight off.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::model::Node;
use crate::storage::GraphStore;
use crate::tokenizer::tokenize_context_query;
use crate::types::NodeKind;

const DEFAULT_MAX_NODES: usize = 25;
const DEFAULT_MAX_CODE_LENGTH: usize = 500;
const KEYWORD_SEARCH_LIMIT: usize = 50;
const EXPANSION_SEED_COUNT: usize = 10;
const MAX_RELATED_NAMES: usize = 5;

const NAME_EXACT_SCORE: f64 = 10.0;
const NAME_CONTAINS_SCORE: f64 = 5.0;
const QUALIFIED_CONTAINS_SCORE: f64 = 3.0;
const SIGNATURE_CONTAINS_SCORE: f64 = 2.0;
const DOCSTRING_CONTAINS_SCORE: f64 = 2.0;
const EXPORTED_SCORE: f64 = 2.0;
const ENTRYPOINT_KIND_SCORE: f64 = 1.0;
const ENTRYPOINT_NAME_SCORE: f64 = 1.0;
const DEPENDENCY_SEED_SCORE: f64 = 0.5;
const DEPENDENT_SEED_SCORE: f64 = 0.4;

const ENTRYPOINT_PREFIXES: [&str; 8] = [
    "main", "index", "app", "server", "handler", "controller", "route", "api",
];

#[derive(Debug, Clone)]
pub struct ContextRequest {
    pub query: String,
    pub max_nodes: usize,
    pub max_code_length: usize,
    pub include_code: bool,
    pub kind: Option<NodeKind>,
    pub file_filter: Option<String>,
}

impl Default for ContextRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_nodes: DEFAULT_MAX_NODES,
            max_code_length: DEFAULT_MAX_CODE_LENGTH,
            include_code: true,
            kind: None,
            file_filter: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextItem {
    pub node: Node,
    pub score: f64,
    pub code: Option<String>,
    pub truncated: bool,
    pub callers: Vec<String>,
    pub callees: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextResult {
    pub items: Vec<ContextItem>,
}

/// Build context for `request` against `store`, reading source snippets from
/// files under `root` when `include_code` is set.
pub fn build(store: &GraphStore, root: &Path, request: &ContextRequest) -> Result<ContextResult> {
    let keywords = tokenize_context_query(&request.query);

    let mut scores: HashMap<String, (Node, f64)> = HashMap::new();
    for keyword in &keywords {
        let hits = store.search_nodes(keyword, request.kind, KEYWORD_SEARCH_LIMIT)?;
        for node in hits {
            if let Some(filter) = &request.file_filter {
                if !node.file_path.contains(filter.as_str()) {
                    continue;
                }
            }
            let score = score_node(&node, keyword);
            let entry = scores
                .entry(node.id.as_str().to_string())
                .or_insert_with(|| (node.clone(), 0.0));
            if score > entry.1 {
                entry.1 = score;
            }
        }
    }

    let mut ranked: Vec<(Node, f64)> = scores.into_values().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    expand_with_graph(store, &mut ranked)?;

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(request.max_nodes);

    let mut items = Vec::with_capacity(ranked.len());
    for (node, score) in ranked {
        items.push(enrich(store, root, node, score, request)?);
    }

    Ok(ContextResult { items })
}

fn score_node(node: &Node, keyword: &str) -> f64 {
    let keyword_lower = keyword.to_lowercase();
    let name_lower = node.name.to_lowercase();
    let mut score = 0.0;

    if name_lower == keyword_lower {
        score += NAME_EXACT_SCORE;
    } else if name_lower.contains(&keyword_lower) {
        score += NAME_CONTAINS_SCORE;
    }

    if node.qualified_name.to_lowercase().contains(&keyword_lower) {
        score += QUALIFIED_CONTAINS_SCORE;
    }
    if node
        .signature
        .as_deref()
        .is_some_and(|s| s.to_lowercase().contains(&keyword_lower))
    {
        score += SIGNATURE_CONTAINS_SCORE;
    }
    if node
        .docstring
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains(&keyword_lower))
    {
        score += DOCSTRING_CONTAINS_SCORE;
    }
    if node.exported {
        score += EXPORTED_SCORE;
    }
    if matches!(node.kind, NodeKind::Class | NodeKind::Interface | NodeKind::Component) {
        score += ENTRYPOINT_KIND_SCORE;
    }
    if ENTRYPOINT_PREFIXES.iter().any(|p| name_lower.starts_with(p)) {
        score += ENTRYPOINT_NAME_SCORE;
    }

    score
}

fn expand_with_graph(store: &GraphStore, ranked: &mut Vec<(Node, f64)>) -> Result<()> {
    let seeds: Vec<Node> = ranked.iter().take(EXPANSION_SEED_COUNT).map(|(n, _)| n.clone()).collect();
    let mut seen: std::collections::HashSet<String> =
        ranked.iter().map(|(n, _)| n.id.as_str().to_string()).collect();

    for seed in &seeds {
        for (_, deps) in store.get_dependencies(&seed.id)? {
            for node in deps {
                if seen.insert(node.id.as_str().to_string()) {
                    ranked.push((node, DEPENDENCY_SEED_SCORE));
                }
            }
        }
        for (_, deps) in store.get_dependents(&seed.id)? {
            for node in deps {
                if seen.insert(node.id.as_str().to_string()) {
                    ranked.push((node, DEPENDENT_SEED_SCORE));
                }
            }
        }
    }

    Ok(())
}

fn enrich(store: &GraphStore, root: &Path, node: Node, score: f64, request: &ContextRequest) -> Result<ContextItem> {
    let mut code = None;
    let mut truncated = false;

    if request.include_code {
        if let Some(slice) = read_lines(root, &node) {
            let (text, was_truncated) = truncate_code(&slice, request.max_code_length);
            truncated = was_truncated;
            code = Some(text);
        }
    }

    let callers = store
        .get_callers(&node.id, MAX_RELATED_NAMES)?
        .into_iter()
        .map(|n| n.qualified_name)
        .collect();
    let callees = store
        .get_callees(&node.id, MAX_RELATED_NAMES)?
        .into_iter()
        .map(|n| n.qualified_name)
        .collect();

    Ok(ContextItem {
        node,
        score,
        code,
        truncated,
        callers,
        callees,
    })
}

fn read_lines(root: &Path, node: &Node) -> Option<String> {
    let content = std::fs::read_to_string(root.join(&node.file_path)).ok()?;
    let start = node.range.start_line.saturating_sub(1) as usize;
    let end = node.range.end_line as usize;
    let lines: Vec<&str> = content.lines().collect();
    if start >= lines.len() {
        return None;
    }
    let end = end.min(lines.len());
    Some(lines[start..end].join("\n"))
}

fn truncate_code(code: &str, max_len: usize) -> (String, bool) {
    if code.chars().count() <= max_len {
        return (code.to_string(), false);
    }
    let mut truncated: String = code.chars().take(max_len).collect();
    truncated.push_str("...");
    (truncated, true)
}

/// The per-file, human-readable document shape (output shape 1 of §4.9).
pub fn render_document(result: &ContextResult) -> String {
    let mut by_file: Vec<(&str, Vec<&ContextItem>)> = Vec::new();
    for item in &result.items {
        match by_file.iter_mut().find(|(f, _)| *f == item.node.file_path) {
            Some((_, items)) => items.push(item),
            None => by_file.push((item.node.file_path.as_str(), vec![item])),
        }
    }

    let mut out = String::new();
    for (file, items) in by_file {
        out.push_str(&format!("## {file}\n\n"));
        for item in items {
            out.push_str(&format!(
                "### {} ({}) [{}:{}]\n",
                item.node.qualified_name, item.node.kind.as_str(), item.node.range.start_line, item.node.range.end_line
            ));
            if let Some(doc) = &item.node.docstring {
                out.push_str(&format!("{doc}\n"));
            }
            if let Some(code) = &item.code {
                out.push_str(&format!("```{}\n{}\n```\n", item.node.language, code));
            }
            out.push('\n');
        }
    }
    out
}

/// The single-line-per-symbol listing shape (output shape 2 of §4.9).
pub fn render_listing(result: &ContextResult) -> String {
    result
        .items
        .iter()
        .map(|item| {
            format!(
                "{:.1}  {}  {}  {}:{}-{}",
                item.score,
                item.node.kind.as_str(),
                item.node.qualified_name,
                item.node.file_path,
                item.node.range.start_line,
                item.node.range.end_line
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineRange;
    use tempfile::TempDir;

    fn setup() -> (GraphStore, TempDir) {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("auth.rs"),
            "fn authenticate_user(password: &str) -> bool {\n    validate(password)\n}\n",
        )
        .unwrap();
        let store = GraphStore::open(&dir.path().join("codexray.db")).unwrap();
        (store, dir)
    }

    #[test]
    fn build_scores_name_matches_above_unrelated_nodes() {
        let (store, dir) = setup();
        let auth = Node::new(
            NodeKind::Function,
            "authenticate_user",
            "auth.rs",
            LineRange::new(1, 3),
            "rust",
            true,
            1,
        )
        .with_signature("fn authenticate_user(password: &str) -> bool");
        let unrelated = Node::new(NodeKind::Function, "render", "auth.rs", LineRange::new(1, 1), "rust", true, 1);
        store.upsert_node(&auth).unwrap();
        store.upsert_node(&unrelated).unwrap();

        let request = ContextRequest {
            query: "authenticate user".to_string(),
            ..Default::default()
        };
        let result = build(&store, dir.path(), &request).unwrap();

        assert_eq!(result.items[0].node.name, "authenticate_user");
        assert!(result.items[0].code.as_deref().unwrap().contains("validate"));
    }

    #[test]
    fn code_longer_than_cap_is_truncated_with_ellipsis() {
        let (text, truncated) = truncate_code(&"x".repeat(600), 500);
        assert!(truncated);
        assert!(text.ends_with("..."));
        assert_eq!(text.chars().count(), 503);
    }

    #[test]
    fn render_listing_is_one_line_per_symbol() {
        let node = Node::new(NodeKind::Function, "f", "a.rs", LineRange::new(1, 2), "rust", true, 1);
        let result = ContextResult {
            items: vec![ContextItem {
                node,
                score: 10.0,
                code: None,
                truncated: false,
                callers: vec![],
                callees: vec![],
            }],
        };
        let listing = render_listing(&result);
        assert_eq!(listing.lines().count(), 1);
    }
}
