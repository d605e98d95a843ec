//! Graph store (C5): a single SQLite file holding nodes, edges, file
//! records, an FTS5 keyword index, and the TF-IDF token tables, with the
//! graph algorithms of §4.6 layered on top.

mod graph_algo;
mod schema;

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;

use crate::error::{Result, StorageError};
use crate::model::{Edge, FileRecord, Node};
use crate::types::{EdgeKind, LineRange, NodeId, NodeKind};

pub use graph_algo::ImpactHit;

#[cfg(test)]
pub(crate) fn test_schema() -> &'static str {
    schema::SCHEMA
}

const FTS_SANITIZE_PATTERN: &[char] = &['"', '\'', '*', '(', ')', ':', '^', '-'];
const NAME_LOOKUP_CAP: i64 = 20;

pub struct GraphStore {
    conn: Connection,
}

/// Direction to walk when collecting neighbors along typed edges.
#[derive(Clone, Copy)]
enum Direction {
    /// `id` is the edge source; return targets.
    Outgoing,
    /// `id` is the edge target; return sources.
    Incoming,
    /// Either side matches; return whichever end is not `id`.
    Either,
}

impl GraphStore {
    /// Open (creating if absent) the store at `path`, applying the pragmas
    /// required for a single-writer, many-reader embedded database.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "cache_size", -64_000)?;
        conn.pragma_update(None, "mmap_size", 256 * 1024 * 1024i64)?;
        conn.execute_batch(schema::SCHEMA)?;

        Ok(Self { conn })
    }

    #[cfg(test)]
    fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(schema::SCHEMA)?;
        Ok(Self { conn })
    }

    // ---- upserts ----------------------------------------------------

    pub fn upsert_node(&self, node: &Node) -> Result<()> {
        let metadata = node.metadata.as_ref().map(|v| v.to_string());
        self.conn.execute(
            "INSERT INTO nodes (id, kind, name, qualified_name, file_path, start_line, end_line, \
             language, signature, docstring, exported, complexity, metadata) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) \
             ON CONFLICT(id) DO UPDATE SET \
               kind=excluded.kind, name=excluded.name, qualified_name=excluded.qualified_name, \
               file_path=excluded.file_path, start_line=excluded.start_line, end_line=excluded.end_line, \
               language=excluded.language, signature=excluded.signature, docstring=excluded.docstring, \
               exported=excluded.exported, complexity=excluded.complexity, metadata=excluded.metadata",
            params![
                node.id.as_str(),
                node.kind.as_str(),
                node.name,
                node.qualified_name,
                node.file_path,
                node.range.start_line,
                node.range.end_line,
                node.language,
                node.signature,
                node.docstring,
                node.exported,
                node.complexity,
                metadata,
            ],
        )?;
        Ok(())
    }

    pub fn upsert_edge(&self, edge: &Edge) -> Result<()> {
        let metadata = edge.metadata.as_ref().map(|v| v.to_string());
        self.conn.execute(
            "INSERT INTO edges (id, source_id, target_id, kind, metadata) VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(id) DO UPDATE SET metadata=excluded.metadata",
            params![
                edge.id.as_str(),
                edge.source.as_str(),
                edge.target.as_str(),
                edge.kind.as_str(),
                metadata,
            ],
        )?;
        Ok(())
    }

    pub fn upsert_file(&self, file: &FileRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO files (path, hash, language, indexed_at, symbol_count, line_count) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(path) DO UPDATE SET \
               hash=excluded.hash, language=excluded.language, indexed_at=excluded.indexed_at, \
               symbol_count=excluded.symbol_count, line_count=excluded.line_count",
            params![
                file.path,
                file.hash,
                file.language,
                file.indexed_at,
                file.symbol_count,
                file.line_count,
            ],
        )?;
        Ok(())
    }

    /// A transaction wrapping every upsert for one file's extraction batch.
    pub fn with_file_transaction<F, T>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let tx = self.conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    // ---- lookups ------------------------------------------------------

    pub fn get_node(&self, id: &NodeId) -> Result<Option<Node>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM nodes WHERE id = ?1",
                params![id.as_str()],
                row_to_node,
            )
            .optional()?)
    }

    /// Tiered matching: exact name, then exact qualified_name, then
    /// `qualified_name LIKE %name%`, capped and ordered for determinism.
    pub fn get_nodes_by_name(&self, name: &str, kind: Option<NodeKind>) -> Result<Vec<Node>> {
        let kind_str = kind.map(|k| k.as_str());

        let exact = self.query_nodes_where("name = ?1 AND (?2 IS NULL OR kind = ?2)", params![name, kind_str])?;
        if !exact.is_empty() {
            return Ok(exact);
        }

        let qualified = self.query_nodes_where(
            "qualified_name = ?1 AND (?2 IS NULL OR kind = ?2)",
            params![name, kind_str],
        )?;
        if !qualified.is_empty() {
            return Ok(qualified);
        }

        let like_pattern = format!("%{name}%");
        self.query_nodes_where(
            "qualified_name LIKE ?1 AND (?2 IS NULL OR kind = ?2)",
            params![like_pattern, kind_str],
        )
    }

    /// `clause` must not include its own `ORDER BY`/`LIMIT`; both are fixed
    /// to the disambiguation ordering and the §4.4 name-lookup cap.
    fn query_nodes_where(&self, clause: &str, p: &[&dyn rusqlite::ToSql]) -> Result<Vec<Node>> {
        let sql = format!(
            "SELECT * FROM nodes WHERE {clause} ORDER BY exported DESC, file_path ASC LIMIT {NAME_LOOKUP_CAP}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(p, row_to_node)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn get_nodes_by_file(&self, file_path: &str) -> Result<Vec<Node>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM nodes WHERE file_path = ?1 ORDER BY start_line ASC")?;
        let rows = stmt.query_map(params![file_path], row_to_node)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Look up the stored record for a single file, if it has been indexed.
    pub fn get_file(&self, file_path: &str) -> Result<Option<FileRecord>> {
        self.conn
            .query_row(
                "SELECT path, hash, language, indexed_at, symbol_count, line_count FROM files WHERE path = ?1",
                params![file_path],
                row_to_file,
            )
            .optional()
            .map_err(|e: rusqlite::Error| e.into())
    }

    pub fn delete_nodes_by_file(&self, file_path: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM nodes WHERE file_path = ?1", params![file_path])?;
        Ok(())
    }

    /// Drop a file's record. Call alongside [`Self::delete_nodes_by_file`]
    /// when a tracked file disappears from disk.
    pub fn delete_file(&self, file_path: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM files WHERE path = ?1", params![file_path])?;
        Ok(())
    }

    /// Removes any edge whose source or target lives in `file_path`. Cascade
    /// deletion via [`Self::delete_nodes_by_file`] already covers most of
    /// this; kept as a standalone operation for callers that delete edges
    /// ahead of nodes.
    pub fn delete_edges_by_file(&self, file_path: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM edges WHERE source_id IN (SELECT id FROM nodes WHERE file_path = ?1) \
             OR target_id IN (SELECT id FROM nodes WHERE file_path = ?1)",
            params![file_path],
        )?;
        Ok(())
    }

    /// Keyword search: FTS5 prefix match primary path, `LIKE` fallback when
    /// the sanitized query is rejected by FTS5 (e.g. empty after stripping).
    pub fn search_nodes(&self, query: &str, kind: Option<NodeKind>, limit: usize) -> Result<Vec<Node>> {
        let sanitized = sanitize_fts_query(query);
        let kind_str = kind.map(|k| k.as_str());

        if !sanitized.is_empty() {
            let match_expr = format!("{sanitized}*");
            let mut stmt = self.conn.prepare(
                "SELECT n.* FROM nodes n JOIN nodes_fts f ON n.id = f.id \
                 WHERE nodes_fts MATCH ?1 AND (?2 IS NULL OR n.kind = ?2) \
                 ORDER BY rank LIMIT ?3",
            )?;
            let rows = stmt.query_map(params![match_expr, kind_str, limit as i64], row_to_node);
            if let Ok(mapped) = rows {
                let results: rusqlite::Result<Vec<_>> = mapped.collect();
                if let Ok(results) = results {
                    if !results.is_empty() {
                        return Ok(results);
                    }
                }
            }
        }

        let like_pattern = format!("%{query}%");
        let mut stmt = self.conn.prepare(
            "SELECT * FROM nodes WHERE (name LIKE ?1 OR qualified_name LIKE ?1) \
             AND (?2 IS NULL OR kind = ?2) ORDER BY exported DESC, file_path ASC LIMIT ?3",
        )?;
        let rows = stmt.query_map(params![like_pattern, kind_str, limit as i64], row_to_node)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn semantic_search(&self, query: &str, limit: usize) -> Result<Vec<(Node, f64)>> {
        crate::semantic::query(&self.conn, query, limit)
    }

    pub fn rebuild_semantic_index(&mut self) -> Result<()> {
        crate::semantic::rebuild(&mut self.conn)
    }

    // ---- neighbors ------------------------------------------------------

    pub fn get_callers(&self, id: &NodeId, limit: usize) -> Result<Vec<Node>> {
        self.neighbors(id, &[EdgeKind::Calls], Direction::Incoming, limit)
    }

    pub fn get_callees(&self, id: &NodeId, limit: usize) -> Result<Vec<Node>> {
        self.neighbors(id, &[EdgeKind::Calls], Direction::Outgoing, limit)
    }

    /// All outgoing relationships, grouped by edge kind.
    pub fn get_dependencies(&self, id: &NodeId) -> Result<HashMap<EdgeKind, Vec<Node>>> {
        self.grouped_neighbors(id, Direction::Outgoing)
    }

    /// All incoming relationships, grouped by edge kind.
    pub fn get_dependents(&self, id: &NodeId) -> Result<HashMap<EdgeKind, Vec<Node>>> {
        self.grouped_neighbors(id, Direction::Incoming)
    }

    pub fn get_children(&self, id: &NodeId) -> Result<Vec<Node>> {
        let mut stmt = self.conn.prepare(
            "SELECT n.* FROM nodes n JOIN edges e ON n.id = e.target_id \
             WHERE e.source_id = ?1 AND e.kind IN (?2, ?3, ?4) \
             ORDER BY n.start_line ASC",
        )?;
        let rows = stmt.query_map(
            params![
                id.as_str(),
                EdgeKind::HasMethod.as_str(),
                EdgeKind::HasProperty.as_str(),
                EdgeKind::Contains.as_str(),
            ],
            row_to_node,
        )?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn neighbors(&self, id: &NodeId, kinds: &[EdgeKind], direction: Direction, limit: usize) -> Result<Vec<Node>> {
        let ids = self.neighbor_ids(id, kinds, direction)?;
        let mut nodes = Vec::with_capacity(ids.len().min(limit));
        for nid in ids.into_iter().take(limit) {
            if let Some(node) = self.get_node(&nid)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    fn grouped_neighbors(&self, id: &NodeId, direction: Direction) -> Result<HashMap<EdgeKind, Vec<Node>>> {
        let (select_col, filter_col) = match direction {
            Direction::Outgoing => ("target_id", "source_id"),
            Direction::Incoming => ("source_id", "target_id"),
            Direction::Either => unreachable!("grouped_neighbors is always directional"),
        };
        let sql = format!(
            "SELECT kind, {select_col} FROM edges WHERE {filter_col} = ?1 ORDER BY {select_col} ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![id.as_str()], |row| {
            let kind: String = row.get(0)?;
            let neighbor_id: String = row.get(1)?;
            Ok((kind, neighbor_id))
        })?;

        let mut grouped: HashMap<EdgeKind, Vec<Node>> = HashMap::new();
        for row in rows {
            let (kind_str, neighbor_id) = row?;
            let Some(kind) = EdgeKind::from_str_opt(&kind_str) else { continue };
            if let Some(node) = self.get_node(&NodeId::from(neighbor_id))? {
                grouped.entry(kind).or_default().push(node);
            }
        }
        Ok(grouped)
    }

    /// Neighbor ids reachable from `id` by one hop along `kinds`, ordered by
    /// neighbor id for deterministic traversal.
    fn neighbor_ids(&self, id: &NodeId, kinds: &[EdgeKind], direction: Direction) -> Result<Vec<NodeId>> {
        let placeholders: Vec<String> = (0..kinds.len()).map(|i| format!("?{}", i + 2)).collect();
        let kind_list = placeholders.join(", ");

        let sql = match direction {
            Direction::Outgoing => format!(
                "SELECT target_id FROM edges WHERE source_id = ?1 AND kind IN ({kind_list}) ORDER BY target_id ASC"
            ),
            Direction::Incoming => format!(
                "SELECT source_id FROM edges WHERE target_id = ?1 AND kind IN ({kind_list}) ORDER BY source_id ASC"
            ),
            Direction::Either => format!(
                "SELECT target_id FROM edges WHERE source_id = ?1 AND kind IN ({kind_list}) \
                 UNION \
                 SELECT source_id FROM edges WHERE target_id = ?1 AND kind IN ({kind_list}) \
                 ORDER BY 1 ASC"
            ),
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let mut all_params: Vec<&dyn rusqlite::ToSql> = vec![&id.0];
        let kind_strs: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
        for k in &kind_strs {
            all_params.push(k);
        }
        if matches!(direction, Direction::Either) {
            for k in &kind_strs {
                all_params.push(k);
            }
        }

        let rows = stmt.query_map(all_params.as_slice(), |row| row.get::<_, String>(0))?;
        rows.map(|r| r.map(NodeId::from).map_err(Into::into))
            .collect::<Result<Vec<_>>>()
    }

    // ---- graph algorithms (§4.6) ---------------------------------------

    pub fn get_impact_radius(&self, id: &NodeId, max_depth: u32) -> Result<Vec<ImpactHit>> {
        Ok(graph_algo::impact_radius(id, max_depth, |node| {
            self.neighbor_ids(node, &EdgeKind::IMPACT_KINDS, Direction::Incoming)
                .unwrap_or_default()
        }))
    }

    pub fn find_path(&self, from: &NodeId, to: &NodeId, max_depth: u32) -> Result<Option<Vec<NodeId>>> {
        Ok(graph_algo::find_path(from, to, max_depth, |node| {
            self.neighbor_ids(node, &EdgeKind::ALL, Direction::Either)
                .unwrap_or_default()
        }))
    }

    pub fn find_circular_deps(&self) -> Result<Vec<Vec<NodeId>>> {
        let mut stmt = self.conn.prepare("SELECT id FROM nodes ORDER BY id ASC")?;
        let all_ids: Vec<NodeId> = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .map(|r| r.map(NodeId::from))
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(graph_algo::find_circular_deps(&all_ids, |node| {
            self.neighbor_ids(node, &EdgeKind::CYCLE_KINDS, Direction::Outgoing)
                .unwrap_or_default()
        }))
    }

    // ---- reports --------------------------------------------------------

    pub fn find_dead_code(&self, kinds: &[NodeKind], exported_only: bool) -> Result<Vec<Node>> {
        let kind_strs: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
        let placeholders: Vec<String> = (0..kinds.len()).map(|i| format!("?{}", i + 1)).collect();
        let blocking_offset = kinds.len() + 1;
        let blocking_placeholders: Vec<String> = (0..EdgeKind::DEAD_CODE_BLOCKING_KINDS.len())
            .map(|i| format!("?{}", blocking_offset + i))
            .collect();

        let exported_clause = if exported_only { "" } else { "AND n.exported = 0" };
        let sql = format!(
            "SELECT n.* FROM nodes n WHERE n.kind IN ({}) {exported_clause} \
             AND NOT EXISTS (SELECT 1 FROM edges e WHERE e.target_id = n.id AND e.kind IN ({})) \
             ORDER BY n.file_path ASC, n.start_line ASC",
            placeholders.join(", "),
            blocking_placeholders.join(", "),
        );

        let mut params: Vec<&dyn rusqlite::ToSql> = Vec::new();
        for k in &kind_strs {
            params.push(k);
        }
        let blocking_strs: Vec<&str> = EdgeKind::DEAD_CODE_BLOCKING_KINDS.iter().map(|k| k.as_str()).collect();
        for k in &blocking_strs {
            params.push(k);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params.as_slice(), row_to_node)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn find_hotspots(&self, limit: usize) -> Result<Vec<(Node, u32, u32)>> {
        const HOTSPOT_KINDS: [NodeKind; 6] = [
            NodeKind::Function,
            NodeKind::Method,
            NodeKind::Class,
            NodeKind::Interface,
            NodeKind::Component,
            NodeKind::Hook,
        ];
        let kind_strs: Vec<&str> = HOTSPOT_KINDS.iter().map(|k| k.as_str()).collect();
        let placeholders: Vec<String> = (0..kind_strs.len()).map(|i| format!("?{}", i + 2)).collect();

        let sql = format!(
            "SELECT n.*, \
                (SELECT COUNT(*) FROM edges e WHERE e.target_id = n.id) AS in_deg, \
                (SELECT COUNT(*) FROM edges e WHERE e.source_id = n.id) AS out_deg \
             FROM nodes n WHERE n.kind IN ({}) \
             ORDER BY (in_deg + out_deg) DESC, n.id ASC LIMIT ?1",
            placeholders.join(", "),
        );

        let mut params: Vec<&dyn rusqlite::ToSql> = vec![&(limit as i64)];
        for k in &kind_strs {
            params.push(k);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params.as_slice(), |row| {
            let node = row_to_node(row)?;
            let in_deg: i64 = row.get("in_deg")?;
            let out_deg: i64 = row.get("out_deg")?;
            Ok((node, in_deg as u32, out_deg as u32))
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn get_complexity_report(&self, threshold: u8) -> Result<Vec<Node>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM nodes WHERE complexity >= ?1 ORDER BY complexity DESC, id ASC")?;
        let rows = stmt.query_map(params![threshold], row_to_node)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn get_file_tree(&self) -> Result<Vec<FileRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT path, hash, language, indexed_at, symbol_count, line_count FROM files ORDER BY path ASC")?;
        let rows = stmt.query_map([], row_to_file)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn get_stats(&self) -> Result<StoreStats> {
        let node_count: i64 = self.conn.query_row("SELECT COUNT(*) FROM nodes", [], |r| r.get(0))?;
        let edge_count: i64 = self.conn.query_row("SELECT COUNT(*) FROM edges", [], |r| r.get(0))?;
        let file_count: i64 = self.conn.query_row("SELECT COUNT(*) FROM files", [], |r| r.get(0))?;
        Ok(StoreStats {
            node_count: node_count as u64,
            edge_count: edge_count as u64,
            file_count: file_count as u64,
        })
    }

    pub fn reset(&self) -> Result<()> {
        self.conn.execute_batch(
            "DELETE FROM nodes; DELETE FROM edges; DELETE FROM files; \
             DELETE FROM tfidf_terms; DELETE FROM tfidf_idf; DELETE FROM nodes_fts;",
        )?;
        Ok(())
    }

    pub fn vacuum(&self) -> Result<()> {
        self.conn.execute_batch("VACUUM;")?;
        Ok(())
    }

    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| StorageError::Sqlite(e).into())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreStats {
    pub node_count: u64,
    pub edge_count: u64,
    pub file_count: u64,
}

fn row_to_node(row: &Row) -> rusqlite::Result<Node> {
    let kind_str: String = row.get("kind")?;
    let kind = NodeKind::from_str_opt(&kind_str).unwrap_or(NodeKind::Variable);
    let metadata_raw: Option<String> = row.get("metadata")?;
    let metadata: Option<Value> = metadata_raw.and_then(|s| serde_json::from_str(&s).ok());

    let mut node = Node::new(
        kind,
        row.get::<_, String>("name")?,
        row.get::<_, String>("file_path")?,
        LineRange {
            start_line: row.get::<_, i64>("start_line")? as u32,
            end_line: row.get::<_, i64>("end_line")? as u32,
        },
        row.get::<_, String>("language")?,
        row.get::<_, bool>("exported")?,
        row.get::<_, i64>("complexity")? as u8,
    );
    node.id = NodeId::from(row.get::<_, String>("id")?);
    node.qualified_name = row.get::<_, String>("qualified_name")?;
    node.signature = row.get::<_, Option<String>>("signature")?;
    node.docstring = row.get::<_, Option<String>>("docstring")?;
    node.metadata = metadata;
    Ok(node)
}

fn row_to_file(row: &Row) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        path: row.get(0)?,
        hash: row.get(1)?,
        language: row.get(2)?,
        indexed_at: row.get::<_, i64>(3)? as u64,
        symbol_count: row.get::<_, i64>(4)? as u32,
        line_count: row.get::<_, i64>(5)? as u32,
    })
}

/// Strip FTS5 special characters, keeping word characters and spaces.
fn sanitize_fts_query(query: &str) -> String {
    query
        .chars()
        .filter(|c| !FTS_SANITIZE_PATTERN.contains(c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineRange;

    fn sample_node(name: &str, file: &str, line: u32, exported: bool) -> Node {
        Node::new(NodeKind::Function, name, file, LineRange::new(line, line + 2), "rust", exported, 1)
    }

    #[test]
    fn upsert_and_get_node_round_trips() {
        let store = GraphStore::open_in_memory().unwrap();
        let node = sample_node("handler", "src/main.rs", 10, true);
        store.upsert_node(&node).unwrap();
        let fetched = store.get_node(&node.id).unwrap().unwrap();
        assert_eq!(fetched.name, "handler");
        assert!(fetched.exported);
    }

    #[test]
    fn get_nodes_by_name_prefers_exact_match() {
        let store = GraphStore::open_in_memory().unwrap();
        let exact = sample_node("login", "src/auth.rs", 5, true);
        let fuzzy = sample_node("login_helper", "src/auth.rs", 20, false);
        store.upsert_node(&exact).unwrap();
        store.upsert_node(&fuzzy).unwrap();

        let results = store.get_nodes_by_name("login", None).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "login");
    }

    #[test]
    fn delete_nodes_by_file_cascades_to_edges() {
        let mut store = GraphStore::open_in_memory().unwrap();
        let a = sample_node("a", "src/a.rs", 1, true);
        let b = sample_node("b", "src/b.rs", 1, true);
        store.upsert_node(&a).unwrap();
        store.upsert_node(&b).unwrap();
        let edge = Edge::new(a.id.clone(), b.id.clone(), EdgeKind::Calls);
        store.upsert_edge(&edge).unwrap();

        store.delete_nodes_by_file("src/a.rs").unwrap();
        let stats = store.get_stats().unwrap();
        assert_eq!(stats.edge_count, 0);
        let _ = &mut store;
    }

    #[test]
    fn find_dead_code_excludes_called_functions() {
        let store = GraphStore::open_in_memory().unwrap();
        let caller = sample_node("caller", "src/a.rs", 1, true);
        let callee = sample_node("callee", "src/a.rs", 10, true);
        let orphan = sample_node("orphan", "src/a.rs", 20, true);
        store.upsert_node(&caller).unwrap();
        store.upsert_node(&callee).unwrap();
        store.upsert_node(&orphan).unwrap();
        store
            .upsert_edge(&Edge::new(caller.id.clone(), callee.id.clone(), EdgeKind::Calls))
            .unwrap();

        let dead = store.find_dead_code(&[NodeKind::Function], true).unwrap();
        let names: Vec<&str> = dead.iter().map(|n| n.name.as_str()).collect();
        assert!(names.contains(&"orphan"));
        assert!(names.contains(&"caller"));
        assert!(!names.contains(&"callee"));
    }

    #[test]
    fn reset_clears_everything() {
        let store = GraphStore::open_in_memory().unwrap();
        store.upsert_node(&sample_node("a", "src/a.rs", 1, true)).unwrap();
        store.reset().unwrap();
        assert_eq!(store.get_stats().unwrap().node_count, 0);
    }
}
