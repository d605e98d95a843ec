//! DDL for the persistent store: nodes, edges, files, an FTS5 keyword index
//! kept in sync via triggers, and the TF-IDF token table.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS nodes (
    id              TEXT PRIMARY KEY,
    kind            TEXT NOT NULL,
    name            TEXT NOT NULL,
    qualified_name  TEXT NOT NULL,
    file_path       TEXT NOT NULL,
    start_line      INTEGER NOT NULL,
    end_line        INTEGER NOT NULL,
    language        TEXT NOT NULL,
    signature       TEXT,
    docstring       TEXT,
    exported        INTEGER NOT NULL,
    complexity      INTEGER NOT NULL,
    metadata        TEXT
);

CREATE INDEX IF NOT EXISTS idx_nodes_file_path ON nodes(file_path);
CREATE INDEX IF NOT EXISTS idx_nodes_name ON nodes(name);
CREATE INDEX IF NOT EXISTS idx_nodes_qualified_name ON nodes(qualified_name);
CREATE INDEX IF NOT EXISTS idx_nodes_kind ON nodes(kind);

CREATE TABLE IF NOT EXISTS edges (
    id          TEXT PRIMARY KEY,
    source_id   TEXT NOT NULL REFERENCES nodes(id) ON DELETE CASCADE,
    target_id   TEXT NOT NULL REFERENCES nodes(id) ON DELETE CASCADE,
    kind        TEXT NOT NULL,
    metadata    TEXT
);

CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source_id, kind);
CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(target_id, kind);

CREATE TABLE IF NOT EXISTS files (
    path            TEXT PRIMARY KEY,
    hash            TEXT NOT NULL,
    language        TEXT,
    indexed_at      INTEGER NOT NULL,
    symbol_count    INTEGER NOT NULL,
    line_count      INTEGER NOT NULL
);

CREATE VIRTUAL TABLE IF NOT EXISTS nodes_fts USING fts5(
    id UNINDEXED,
    name,
    qualified_name,
    signature,
    docstring,
    tokenize = 'unicode61 remove_diacritics 2'
);

CREATE TRIGGER IF NOT EXISTS nodes_fts_insert AFTER INSERT ON nodes BEGIN
    INSERT INTO nodes_fts (id, name, qualified_name, signature, docstring)
    VALUES (new.id, new.name, new.qualified_name, new.signature, new.docstring);
END;

CREATE TRIGGER IF NOT EXISTS nodes_fts_update AFTER UPDATE ON nodes BEGIN
    DELETE FROM nodes_fts WHERE id = old.id;
    INSERT INTO nodes_fts (id, name, qualified_name, signature, docstring)
    VALUES (new.id, new.name, new.qualified_name, new.signature, new.docstring);
END;

CREATE TRIGGER IF NOT EXISTS nodes_fts_delete AFTER DELETE ON nodes BEGIN
    DELETE FROM nodes_fts WHERE id = old.id;
END;

CREATE TABLE IF NOT EXISTS tfidf_terms (
    node_id TEXT NOT NULL REFERENCES nodes(id) ON DELETE CASCADE,
    token   TEXT NOT NULL,
    tf      REAL NOT NULL,
    source  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tfidf_terms_token ON tfidf_terms(token);
CREATE INDEX IF NOT EXISTS idx_tfidf_terms_node ON tfidf_terms(node_id);

CREATE TABLE IF NOT EXISTS tfidf_idf (
    token TEXT PRIMARY KEY,
    idf   REAL NOT NULL
);
"#;
