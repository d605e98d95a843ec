//! End-to-end scenarios against a freshly initialized store, one per
//! literal case plus the documented boundary behaviors.

use codexray::config::Settings;
use codexray::indexer::full_index;
use codexray::query::QueryEngine;
use codexray::storage::GraphStore;
use codexray::types::NodeKind;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn fresh_store(dir: &TempDir) -> GraphStore {
    GraphStore::open(&dir.path().join("codexray.db")).unwrap()
}

#[test]
fn basic_call_edge() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "a.ts",
        "function callee() {}\nfunction caller() { callee(); }\n",
    );

    let mut store = fresh_store(&dir);
    full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

    let engine = QueryEngine::new(&store);
    let caller = engine
        .find_symbol("caller", None, None)
        .unwrap()
        .pop()
        .expect("caller node");
    let callee = engine
        .find_symbol("callee", None, None)
        .unwrap()
        .pop()
        .expect("callee node");

    let callers_of_callee = engine.callers(&callee.id, 10).unwrap();
    assert_eq!(callers_of_callee.len(), 1);
    assert_eq!(callers_of_callee[0].id, caller.id);

    let callees_of_caller = engine.callees(&caller.id, 10).unwrap();
    assert_eq!(callees_of_caller.len(), 1);
    assert_eq!(callees_of_caller[0].id, callee.id);
}

#[test]
fn dead_code() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "main.rs",
        "fn used() {}\nfn unused() {}\nfn main() { used(); }\n",
    );

    let mut store = fresh_store(&dir);
    full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

    let engine = QueryEngine::new(&store);
    let dead = engine.dead_code(&[NodeKind::Function], false).unwrap();
    let dead_names: Vec<&str> = dead.iter().map(|n| n.name.as_str()).collect();

    assert!(dead_names.contains(&"unused"));
    assert!(!dead_names.contains(&"used"));
    assert!(!dead_names.contains(&"main"));
}

#[test]
fn semantic_ranking() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "auth.ts",
        "function authenticateUser(username: string, password: string) {}\n\
         function validateToken(token: string) {}\n\
         function renderDashboard() {}\n",
    );

    let mut store = fresh_store(&dir);
    full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

    let engine = QueryEngine::new(&store);
    let hits = engine
        .semantic_search("authenticate user password", 5)
        .unwrap();

    assert!(!hits.is_empty());
    assert_eq!(hits[0].0.name, "authenticateUser");
}

#[test]
fn hotspot() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "hub.ts",
        "function hub() {}\n\
         function a() { hub(); }\n\
         function b() { hub(); }\n\
         function c() { hub(); }\n",
    );

    let mut store = fresh_store(&dir);
    full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

    let engine = QueryEngine::new(&store);
    let hotspots = engine.hotspots(5).unwrap();
    let (top, in_degree, out_degree) = &hotspots[0];

    assert_eq!(top.name, "hub");
    assert_eq!(*in_degree, 3);
    assert_eq!(*out_degree, 0);
}

#[test]
fn impact_depth() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "chain.ts",
        "function base() {}\n\
         function middle() { base(); }\n\
         function top() { middle(); }\n",
    );

    let mut store = fresh_store(&dir);
    full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

    let engine = QueryEngine::new(&store);
    let base = engine.find_symbol("base", None, None).unwrap().pop().unwrap();

    let hits = engine.impact_radius(&base.id, 3).unwrap();
    assert_eq!(hits.len(), 2);

    let by_name: std::collections::HashMap<String, u32> = hits
        .iter()
        .map(|hit| {
            let node = engine.get_node(&hit.node_id).unwrap().unwrap();
            (node.name, hit.distance)
        })
        .collect();

    assert_eq!(by_name["middle"], 1);
    assert_eq!(by_name["top"], 2);
}

#[test]
fn path_between_symbols() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "chain.ts",
        "function start() { middle(); }\n\
         function middle() { end(); }\n\
         function end() {}\n\
         function isolated1() {}\n\
         function isolated2() {}\n",
    );

    let mut store = fresh_store(&dir);
    full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

    let engine = QueryEngine::new(&store);
    let start = engine.find_symbol("start", None, None).unwrap().pop().unwrap();
    let end = engine.find_symbol("end", None, None).unwrap().pop().unwrap();

    let path = engine.path_between(&start.id, &end.id, 10).unwrap().unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path[0], start.id);
    assert_eq!(path[2], end.id);

    let isolated1 = engine.find_symbol("isolated1", None, None).unwrap().pop().unwrap();
    let isolated2 = engine.find_symbol("isolated2", None, None).unwrap().pop().unwrap();
    assert!(engine.path_between(&isolated1.id, &isolated2.id, 10).unwrap().is_none());
}

#[test]
fn boundary_empty_semantic_query_returns_empty_not_error() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.rs", "fn a() {}\n");

    let mut store = fresh_store(&dir);
    full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

    let engine = QueryEngine::new(&store);
    let hits = engine.semantic_search("", 10).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn boundary_path_from_equals_to_is_single_node() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.rs", "fn a() {}\n");

    let mut store = fresh_store(&dir);
    full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

    let engine = QueryEngine::new(&store);
    let a = engine.find_symbol("a", None, None).unwrap().pop().unwrap();
    let path = engine.path_between(&a.id, &a.id, 10).unwrap().unwrap();
    assert_eq!(path, vec![a.id]);
}

#[test]
fn boundary_impact_radius_from_leaf_is_empty() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.rs", "fn leaf() {}\n");

    let mut store = fresh_store(&dir);
    full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

    let engine = QueryEngine::new(&store);
    let leaf = engine.find_symbol("leaf", None, None).unwrap().pop().unwrap();
    assert!(engine.impact_radius(&leaf.id, 5).unwrap().is_empty());
}

#[test]
fn boundary_dag_has_no_cycles() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "dag.ts",
        "function top() { middle(); }\nfunction middle() { base(); }\nfunction base() {}\n",
    );

    let mut store = fresh_store(&dir);
    full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();

    let engine = QueryEngine::new(&store);
    assert!(engine.circular_dependencies().unwrap().is_empty());
}

#[test]
fn boundary_oversized_file_excluded_from_discovery() {
    let dir = TempDir::new().unwrap();
    let big_body = "a".repeat(1024);
    write(&dir, "huge.rs", &format!("// {big_body}\nfn f() {{}}\n"));

    let mut settings = Settings::default();
    settings.max_file_size = 100;

    let mut store = fresh_store(&dir);
    let report = full_index(&mut store, dir.path(), &settings, false).unwrap();

    assert_eq!(report.files_indexed, 0);
    assert_eq!(store.get_stats().unwrap().file_count, 0);
}

#[test]
fn idempotent_reindex_leaves_node_set_unchanged() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.rs", "fn a() {}\nfn b() { a(); }\n");

    let mut store = fresh_store(&dir);
    full_index(&mut store, dir.path(), &Settings::default(), false).unwrap();
    let first = store.get_stats().unwrap();

    full_index(&mut store, dir.path(), &Settings::default(), true).unwrap();
    let second = store.get_stats().unwrap();

    assert_eq!(first.node_count, second.node_count);
    assert_eq!(first.edge_count, second.edge_count);
}
