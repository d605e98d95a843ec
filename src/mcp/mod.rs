//! MCP (Model Context Protocol) tool surface (§6): exposes the query engine
//! and context builder to AI coding assistants over stdio.
//!
//! The sixteen tools are thin wrappers around [`crate::query::QueryEngine`]
//! and [`crate::context`] - no query logic lives here, only request parsing,
//! disambiguation-friendly formatting, and error translation.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorCode, ErrorData as McpError, Implementation, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    schemars,
    service::{RequestContext, RoleServer},
    tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::context::{self, ContextRequest};
use crate::error::Error as EngineError;
use crate::model::Node;
use crate::query::QueryEngine;
use crate::storage::GraphStore;
use crate::types::{NodeId, NodeKind};

fn engine_error(e: EngineError) -> McpError {
    McpError::new(ErrorCode::INTERNAL_ERROR, e.to_string(), None)
}

fn invalid_kind(kind: &str) -> McpError {
    McpError::new(
        ErrorCode::INVALID_PARAMS,
        format!("unknown symbol kind '{kind}'"),
        None,
    )
}

fn parse_kind(kind: Option<&str>) -> Result<Option<NodeKind>, McpError> {
    match kind {
        None => Ok(None),
        Some(k) => NodeKind::from_str_opt(k).map(Some).ok_or_else(|| invalid_kind(k)),
    }
}

fn format_candidates(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|n| {
            format!(
                "- {} {} ({}:{}) [id:{}]",
                n.kind.as_str(),
                n.qualified_name,
                n.file_path,
                n.range.start_line,
                n.id.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn text(s: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(s.into())])
}

fn default_limit() -> u32 {
    10
}
fn default_depth() -> u32 {
    3
}
fn default_max_nodes() -> u32 {
    25
}
fn default_max_code_length() -> u32 {
    500
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct FindSymbolRequest {
    /// Name of the symbol to find (exact match, case-sensitive)
    pub name: String,
    /// Restrict to this symbol kind (e.g. "function", "class", "struct")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Narrow candidates to file paths containing this substring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_hint: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct GetNodeRequest {
    /// The node id, as returned by find_symbol or any other tool
    pub node_id: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct NodeLimitRequest {
    pub node_id: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ImpactRequest {
    pub node_id: String,
    /// Maximum traversal depth (default 3)
    #[serde(default = "default_depth")]
    pub max_depth: u32,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct DependenciesRequest {
    pub node_id: String,
    /// List what depends on this node instead of what it depends on
    #[serde(default)]
    pub reverse: bool,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct LimitRequest {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct BuildContextRequest {
    /// Natural-language task description
    pub query: String,
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u32,
    #[serde(default = "default_max_code_length")]
    pub max_code_length: u32,
    #[serde(default = "default_true")]
    pub include_code: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_filter: Option<String>,
    /// "document" (grouped markdown, default) or "listing" (one line per symbol)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct PathRequest {
    pub from_node_id: String,
    pub to_node_id: String,
    #[serde(default = "default_depth")]
    pub max_depth: u32,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct DeadCodeRequest {
    /// Restrict to these symbol kinds; empty means all kinds
    #[serde(default)]
    pub kinds: Vec<String>,
    /// Only report exported symbols with no callers
    #[serde(default)]
    pub exported_only: bool,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ComplexityRequest {
    /// Minimum complexity score to report (1-100)
    #[serde(default = "default_complexity_threshold")]
    pub threshold: u8,
}

fn default_complexity_threshold() -> u8 {
    20
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct NoArgs {}

/// MCP server state: an open store plus the project root its file paths are
/// relative to. Stdio transport only - see `codexray serve`.
#[derive(Clone)]
pub struct CodeIntelligenceServer {
    store: Arc<RwLock<GraphStore>>,
    root: PathBuf,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CodeIntelligenceServer {
    pub fn new(store: GraphStore, root: PathBuf) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            root,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Find a symbol by exact name. Returns disambiguation candidates \
        (kind, qualified name, file:line, id) when the name exists in more than one file.")]
    pub async fn find_symbol(
        &self,
        Parameters(FindSymbolRequest { name, kind, file_hint }): Parameters<FindSymbolRequest>,
    ) -> Result<CallToolResult, McpError> {
        let kind = parse_kind(kind.as_deref())?;
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);

        match engine.find_symbol(&name, kind, file_hint.as_deref()) {
            Ok(nodes) if nodes.is_empty() => {
                let fallback = engine.search(&name, kind, 10).map_err(engine_error)?;
                if fallback.is_empty() {
                    Ok(text(format!("No symbol named '{name}' found")))
                } else {
                    Ok(text(format!(
                        "No exact match for '{name}'. Closest keyword matches:\n{}",
                        format_candidates(&fallback)
                    )))
                }
            }
            Ok(nodes) => Ok(text(format!(
                "Found '{name}':\n{}",
                format_candidates(&nodes)
            ))),
            Err(EngineError::Ambiguous { candidates, .. }) => Ok(text(format!(
                "Ambiguous: '{name}' exists in {} distinct files. Narrow with file_hint:\n{}",
                candidates.iter().map(|n| n.file_path.as_str()).collect::<std::collections::HashSet<_>>().len(),
                format_candidates(&candidates)
            ))),
            Err(e) => Err(engine_error(e)),
        }
    }

    #[tool(description = "Look up a single node by id and return its full record \
        (signature, docstring, complexity, export status) as JSON.")]
    pub async fn get_node(
        &self,
        Parameters(GetNodeRequest { node_id }): Parameters<GetNodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        match engine.get_node(&NodeId::from(node_id.clone())).map_err(engine_error)? {
            Some(node) => Ok(text(
                serde_json::to_string_pretty(&node).unwrap_or_else(|_| "{}".to_string()),
            )),
            None => Ok(text(format!("No node with id '{node_id}'"))),
        }
    }

    #[tool(description = "Functions/methods this node calls.")]
    pub async fn get_callees(
        &self,
        Parameters(NodeLimitRequest { node_id, limit }): Parameters<NodeLimitRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let nodes = engine
            .callees(&NodeId::from(node_id), limit as usize)
            .map_err(engine_error)?;
        if nodes.is_empty() {
            return Ok(text("No outgoing calls"));
        }
        Ok(text(format_candidates(&nodes)))
    }

    #[tool(description = "Functions/methods that call this node.")]
    pub async fn get_callers(
        &self,
        Parameters(NodeLimitRequest { node_id, limit }): Parameters<NodeLimitRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let nodes = engine
            .callers(&NodeId::from(node_id), limit as usize)
            .map_err(engine_error)?;
        if nodes.is_empty() {
            return Ok(text("No callers"));
        }
        Ok(text(format_candidates(&nodes)))
    }

    #[tool(
        description = "Everything reachable upstream of changing this node (callers of \
        callers, transitively), with distance. Use before editing a widely-used symbol."
    )]
    pub async fn analyze_impact(
        &self,
        Parameters(ImpactRequest { node_id, max_depth }): Parameters<ImpactRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let hits = engine
            .impact_radius(&NodeId::from(node_id), max_depth)
            .map_err(engine_error)?;
        if hits.is_empty() {
            return Ok(text("Nothing depends on this node"));
        }
        let mut out = format!("{} symbol(s) impacted (max depth {max_depth}):\n", hits.len());
        for hit in hits {
            if let Some(node) = engine.get_node(&hit.node_id).map_err(engine_error)? {
                out.push_str(&format!(
                    "- [{}] {} {} ({}:{})\n",
                    hit.distance,
                    node.kind.as_str(),
                    node.qualified_name,
                    node.file_path,
                    node.range.start_line
                ));
            }
        }
        Ok(text(out))
    }

    #[tool(description = "What this node depends on (reverse=false) or what depends on \
        it (reverse=true), grouped by relationship kind.")]
    pub async fn get_dependencies(
        &self,
        Parameters(DependenciesRequest { node_id, reverse }): Parameters<DependenciesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let id = NodeId::from(node_id);
        let groups = if reverse {
            engine.dependents(&id).map_err(engine_error)?
        } else {
            engine.dependencies(&id).map_err(engine_error)?
        };
        if groups.values().all(|v| v.is_empty()) {
            return Ok(text("None"));
        }
        let mut out = String::new();
        for (kind, nodes) in groups {
            if nodes.is_empty() {
                continue;
            }
            out.push_str(&format!("{}:\n{}\n", kind.as_str(), format_candidates(&nodes)));
        }
        Ok(text(out))
    }

    #[tool(description = "Natural-language symbol search over names, signatures, and \
        docstrings (cosine similarity over a TF-IDF index).")]
    pub async fn semantic_search(
        &self,
        Parameters(SearchRequest { query, limit }): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let hits = engine
            .semantic_search(&query, limit as usize)
            .map_err(engine_error)?;
        if hits.is_empty() {
            return Ok(text(format!("No semantic matches for '{query}'")));
        }
        let mut out = format!("{} result(s) for '{query}':\n", hits.len());
        for (node, score) in hits {
            out.push_str(&format!(
                "{:.3}  {} {} ({}:{}) [id:{}]\n",
                score,
                node.kind.as_str(),
                node.qualified_name,
                node.file_path,
                node.range.start_line,
                node.id.as_str()
            ));
        }
        Ok(text(out))
    }

    #[tool(
        description = "Build a ranked, code-enriched context bundle for a natural-language \
        task description: keyword-scored seed symbols expanded one hop through the \
        dependency graph, with source snippets and caller/callee names attached."
    )]
    pub async fn build_context(
        &self,
        Parameters(BuildContextRequest {
            query,
            max_nodes,
            max_code_length,
            include_code,
            kind,
            file_filter,
            format,
        }): Parameters<BuildContextRequest>,
    ) -> Result<CallToolResult, McpError> {
        let kind = parse_kind(kind.as_deref())?;
        let store = self.store.read().await;
        let request = ContextRequest {
            query,
            max_nodes: max_nodes as usize,
            max_code_length: max_code_length as usize,
            include_code,
            kind,
            file_filter,
        };
        let result = context::build(&store, &self.root, &request).map_err(engine_error)?;
        if result.items.is_empty() {
            return Ok(text("No matching context found"));
        }
        let rendered = match format.as_deref() {
            Some("listing") => context::render_listing(&result),
            _ => context::render_document(&result),
        };
        Ok(text(rendered))
    }

    #[tool(description = "Shortest dependency path between two nodes, if one exists \
        within max_depth hops.")]
    pub async fn find_path(
        &self,
        Parameters(PathRequest { from_node_id, to_node_id, max_depth }): Parameters<PathRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let path = engine
            .path_between(&NodeId::from(from_node_id), &NodeId::from(to_node_id), max_depth)
            .map_err(engine_error)?;
        match path {
            None => Ok(text("No path found within max_depth")),
            Some(ids) => {
                let mut out = String::new();
                for id in ids {
                    if let Some(node) = engine.get_node(&id).map_err(engine_error)? {
                        out.push_str(&format!("-> {} ({}:{})\n", node.qualified_name, node.file_path, node.range.start_line));
                    }
                }
                Ok(text(out))
            }
        }
    }

    #[tool(description = "Cycles in the dependency graph. Each cycle is listed as a \
        sequence of qualified names that return to their starting node.")]
    pub async fn find_circular_dependencies(
        &self,
        Parameters(NoArgs {}): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let cycles = engine.circular_dependencies().map_err(engine_error)?;
        if cycles.is_empty() {
            return Ok(text("No circular dependencies found"));
        }
        let mut out = format!("{} cycle(s):\n", cycles.len());
        for (i, cycle) in cycles.iter().enumerate() {
            out.push_str(&format!("{}. ", i + 1));
            let mut names = Vec::with_capacity(cycle.len());
            for id in cycle {
                if let Some(node) = engine.get_node(id).map_err(engine_error)? {
                    names.push(node.qualified_name);
                }
            }
            out.push_str(&names.join(" -> "));
            out.push('\n');
        }
        Ok(text(out))
    }

    #[tool(description = "Exported symbols with no recorded callers or references - \
        candidates for removal. Filter by kind and/or restrict to exported symbols only.")]
    pub async fn find_dead_code(
        &self,
        Parameters(DeadCodeRequest { kinds, exported_only }): Parameters<DeadCodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut parsed_kinds = Vec::with_capacity(kinds.len());
        for k in &kinds {
            parsed_kinds.push(NodeKind::from_str_opt(k).ok_or_else(|| invalid_kind(k))?);
        }
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let nodes = engine
            .dead_code(&parsed_kinds, exported_only)
            .map_err(engine_error)?;
        if nodes.is_empty() {
            return Ok(text("No dead code found"));
        }
        Ok(text(format!(
            "{} unreferenced symbol(s):\n{}",
            nodes.len(),
            format_candidates(&nodes)
        )))
    }

    #[tool(description = "Symbols with the most incoming and outgoing edges combined - \
        the busiest parts of the graph, useful for spotting god objects.")]
    pub async fn get_hotspots(
        &self,
        Parameters(LimitRequest { limit }): Parameters<LimitRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let hits = engine.hotspots(limit as usize).map_err(engine_error)?;
        if hits.is_empty() {
            return Ok(text("No hotspots found"));
        }
        let mut out = String::new();
        for (node, in_degree, out_degree) in hits {
            out.push_str(&format!(
                "{} {} ({}:{}) - in:{in_degree} out:{out_degree}\n",
                node.kind.as_str(),
                node.qualified_name,
                node.file_path,
                node.range.start_line
            ));
        }
        Ok(text(out))
    }

    #[tool(description = "Symbols at or above a complexity threshold (1-100), sorted \
        highest first.")]
    pub async fn get_complexity_report(
        &self,
        Parameters(ComplexityRequest { threshold }): Parameters<ComplexityRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let nodes = engine.complexity_report(threshold).map_err(engine_error)?;
        if nodes.is_empty() {
            return Ok(text(format!("No symbols at or above complexity {threshold}")));
        }
        let mut out = String::new();
        for node in nodes {
            out.push_str(&format!(
                "{:>3}  {} {} ({}:{})\n",
                node.complexity,
                node.kind.as_str(),
                node.qualified_name,
                node.file_path,
                node.range.start_line
            ));
        }
        Ok(text(out))
    }

    #[tool(description = "The indexed file tree: path, language, symbol count, and \
        line count for every tracked file.")]
    pub async fn get_file_tree(
        &self,
        Parameters(NoArgs {}): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let files = engine.file_tree().map_err(engine_error)?;
        if files.is_empty() {
            return Ok(text("No files indexed"));
        }
        let mut out = String::new();
        for file in files {
            out.push_str(&format!(
                "{} ({}) - {} symbol(s), {} line(s)\n",
                file.path,
                file.language.as_deref().unwrap_or("unknown"),
                file.symbol_count,
                file.line_count
            ));
        }
        Ok(text(out))
    }

    #[tool(description = "High-level summary of the indexed codebase: node, edge, and \
        file counts, plus a language breakdown.")]
    pub async fn get_overview(
        &self,
        Parameters(NoArgs {}): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let stats = engine.stats().map_err(engine_error)?;
        let files = engine.file_tree().map_err(engine_error)?;

        let mut by_lang: std::collections::HashMap<String, u32> = std::collections::HashMap::new();
        for file in &files {
            *by_lang
                .entry(file.language.clone().unwrap_or_else(|| "unknown".to_string()))
                .or_insert(0) += 1;
        }
        let mut lang_lines: Vec<String> = by_lang
            .into_iter()
            .map(|(lang, count)| format!("  {lang}: {count} file(s)"))
            .collect();
        lang_lines.sort();

        Ok(text(format!(
            "{} symbol(s), {} edge(s), {} file(s)\n\nBy language:\n{}",
            stats.node_count,
            stats.edge_count,
            stats.file_count,
            lang_lines.join("\n")
        )))
    }

    #[tool(description = "Index freshness: file and symbol counts plus the most recent \
        indexing timestamp. Run `sync` or `watch` if this looks stale.")]
    pub async fn get_status(
        &self,
        Parameters(NoArgs {}): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store.read().await;
        let engine = QueryEngine::new(&store);
        let stats = engine.stats().map_err(engine_error)?;
        let files = engine.file_tree().map_err(engine_error)?;
        let last_indexed = files.iter().map(|f| f.indexed_at).max();

        Ok(text(format!(
            "root: {}\nfiles: {}\nsymbols: {}\nedges: {}\nlast indexed: {}",
            self.root.display(),
            stats.file_count,
            stats.node_count,
            stats.edge_count,
            last_indexed
                .map(|t| t.to_string())
                .unwrap_or_else(|| "never".to_string())
        )))
    }
}

#[tool_handler]
impl ServerHandler for CodeIntelligenceServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "codexray".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("codexray code intelligence".to_string()),
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Code intelligence over this project's source tree. Start with \
                find_symbol or semantic_search to locate a symbol, then get_callers, \
                get_callees, or analyze_impact to understand its usage before editing. \
                Use build_context for a broader, natural-language task description. \
                find_symbol and similar tools report an id; pass it to get_node, \
                get_callers, get_callees, analyze_impact, get_dependencies, and find_path \
                to avoid re-resolving an ambiguous name."
                    .to_string(),
            ),
        }
    }

    async fn initialize(
        &self,
        _request: rmcp::model::InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<rmcp::model::InitializeResult, McpError> {
        Ok(self.get_info())
    }
}
