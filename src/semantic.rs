//! TF-IDF indexer and semantic search (C6).
//!
//! Deliberately not an embeddings index - no model, no vectors - per the
//! spec's "heuristic over ML" trade-off: a hand-rolled term/inverse-document
//! frequency table over the same tokenizer used for the keyword index.

use std::collections::HashMap;

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::model::Node;
use crate::tokenizer::tokenize;
use crate::types::{LineRange, NodeId, NodeKind};

const FIELDS: [&str; 4] = ["name", "qualified_name", "signature", "docstring"];

fn source_weight(source: &str) -> f64 {
    match source {
        "name" => 4.0,
        "signature" => 2.0,
        "docstring" => 1.5,
        _ => 1.0,
    }
}

/// Truncate and rebuild the token/IDF tables from the current node set.
pub fn rebuild(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM tfidf_terms", [])?;
    tx.execute("DELETE FROM tfidf_idf", [])?;

    let node_count: i64 = tx.query_row("SELECT COUNT(*) FROM nodes", [], |r| r.get(0))?;

    let mut document_frequency: HashMap<String, i64> = HashMap::new();

    {
        let mut stmt = tx.prepare(
            "SELECT id, name, qualified_name, signature, docstring FROM nodes",
        )?;
        let mut rows = stmt.query([])?;
        let mut insert = tx.prepare(
            "INSERT INTO tfidf_terms (node_id, token, tf, source) VALUES (?1, ?2, ?3, ?4)",
        )?;

        while let Some(row) = rows.next()? {
            let node_id: String = row.get(0)?;
            let fields: [Option<String>; 4] = [
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ];

            let mut node_tokens: std::collections::HashSet<String> = std::collections::HashSet::new();

            for (field_name, value) in FIELDS.iter().zip(fields.iter()) {
                let Some(text) = value else { continue };
                let tokens = tokenize(text);
                if tokens.is_empty() {
                    continue;
                }
                let mut counts: HashMap<&str, u32> = HashMap::new();
                for t in &tokens {
                    *counts.entry(t.as_str()).or_insert(0) += 1;
                }
                let max_count = *counts.values().max().unwrap_or(&1) as f64;

                for (token, count) in &counts {
                    let tf = *count as f64 / max_count;
                    insert.execute(params![node_id, token, tf, field_name])?;
                    node_tokens.insert(token.to_string());
                }
            }

            for token in node_tokens {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }
    }

    {
        let mut insert_idf = tx.prepare("INSERT INTO tfidf_idf (token, idf) VALUES (?1, ?2)")?;
        for (token, df) in &document_frequency {
            let idf = ((node_count as f64 + 1.0) / (*df as f64 + 1.0)).ln() + 1.0;
            insert_idf.execute(params![token, idf])?;
        }
    }

    drop(document_frequency);
    tx.commit()?;
    Ok(())
}

/// Score nodes against `query_text`, returning the top `limit` by descending
/// score, ties broken by lexicographic node id.
pub fn query(conn: &Connection, query_text: &str, limit: usize) -> Result<Vec<(Node, f64)>> {
    let tokens = tokenize(query_text);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let node_count: i64 = conn.query_row("SELECT COUNT(*) FROM nodes", [], |r| r.get(0))?;
    let default_idf = (node_count as f64 + 1.0).ln();

    let mut idf_by_token: HashMap<String, f64> = HashMap::new();
    for token in &tokens {
        let idf: Option<f64> = conn
            .query_row(
                "SELECT idf FROM tfidf_idf WHERE token = ?1",
                params![token],
                |r| r.get(0),
            )
            .ok();
        idf_by_token.insert(token.clone(), idf.unwrap_or(default_idf));
    }

    let placeholders: Vec<String> = (1..=tokens.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "SELECT node_id, token, tf, source FROM tfidf_terms WHERE token IN ({})",
        placeholders.join(", ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = tokens.iter().map(|t| t as &dyn rusqlite::ToSql).collect();
    let mut rows = stmt.query(params.as_slice())?;

    let mut scores: HashMap<String, f64> = HashMap::new();
    while let Some(row) = rows.next()? {
        let node_id: String = row.get(0)?;
        let token: String = row.get(1)?;
        let tf: f64 = row.get(2)?;
        let source: String = row.get(3)?;
        let idf = idf_by_token.get(&token).copied().unwrap_or(default_idf);
        *scores.entry(node_id).or_insert(0.0) += tf * idf * source_weight(&source);
    }

    let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);

    let mut results = Vec::with_capacity(ranked.len());
    for (node_id, score) in ranked {
        if let Some(node) = fetch_node(conn, &node_id)? {
            results.push((node, score));
        }
    }
    Ok(results)
}

fn fetch_node(conn: &Connection, id: &str) -> Result<Option<Node>> {
    conn.query_row("SELECT * FROM nodes WHERE id = ?1", params![id], |row| {
        let kind_str: String = row.get("kind")?;
        let kind = NodeKind::from_str_opt(&kind_str).unwrap_or(NodeKind::Variable);
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
        Ok(node)
    })
    .optional_result()
}

trait OptionalResult<T> {
    fn optional_result(self) -> Result<Option<T>>;
}

impl<T> OptionalResult<T> for rusqlite::Result<T> {
    fn optional_result(self) -> Result<Option<T>> {
        use rusqlite::Error::QueryReturnedNoRows;
        match self {
            Ok(v) => Ok(Some(v)),
            Err(QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node as ModelNode;
    use crate::types::{LineRange as LR, NodeKind as NK};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(crate::storage::test_schema()).unwrap();
        conn
    }

    fn insert_node(conn: &Connection, n: &ModelNode) {
        conn.execute(
            "INSERT INTO nodes (id, kind, name, qualified_name, file_path, start_line, end_line, \
             language, signature, docstring, exported, complexity, metadata) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, NULL)",
            params![
                n.id.as_str(),
                n.kind.as_str(),
                n.name,
                n.qualified_name,
                n.file_path,
                n.range.start_line,
                n.range.end_line,
                n.language,
                n.signature,
                n.docstring,
                n.exported,
                n.complexity,
            ],
        )
        .unwrap();
    }

    fn node(name: &str, sig: &str) -> ModelNode {
        ModelNode::new(NK::Function, name, "src/auth.rs", LR::new(1, 3), "rust", true, 1).with_signature(sig)
    }

    #[test]
    fn ranks_matching_name_above_unrelated_symbols() {
        let mut conn = test_conn();
        let a = node("authenticateUser", "fn authenticateUser(password: &str)");
        let b = node("validateToken", "fn validateToken(token: &str)");
        let c = node("renderDashboard", "fn renderDashboard()");
        insert_node(&conn, &a);
        insert_node(&conn, &b);
        insert_node(&conn, &c);
        rebuild(&mut conn).unwrap();

        let results = query(&conn, "authenticate user password", 3).unwrap();
        assert_eq!(results[0].0.name, "authenticateUser");
    }

    #[test]
    fn empty_query_yields_no_results() {
        let mut conn = test_conn();
        insert_node(&conn, &node("foo", "fn foo()"));
        rebuild(&mut conn).unwrap();
        assert!(query(&conn, "", 10).unwrap().is_empty());
    }
}
