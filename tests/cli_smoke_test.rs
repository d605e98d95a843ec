//! Smoke tests for the CLI binary: init lays down config, index then status
//! report what was found, query finds what was indexed.

use std::process::Command;
use tempfile::TempDir;

fn codexray(dir: &std::path::Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_codexray"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run codexray")
}

#[test]
fn init_creates_config_and_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();

    let output = codexray(dir.path(), &["init"]);
    assert!(output.status.success(), "{:?}", output);

    assert!(dir.path().join(".codexray/config.json").exists());
    assert!(dir.path().join(".codexray/codexray.db").exists());

    let ignore = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    assert!(ignore.lines().any(|l| l == ".codexray/"));
}

#[test]
fn init_is_idempotent_on_gitignore() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();

    codexray(dir.path(), &["init"]);
    codexray(dir.path(), &["init"]);

    let ignore = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    let occurrences = ignore.lines().filter(|l| *l == ".codexray/").count();
    assert_eq!(occurrences, 1);
}

#[test]
fn index_then_query_finds_symbol() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("lib.rs"),
        "fn find_me() {}\nfn main() { find_me(); }\n",
    )
    .unwrap();

    assert!(codexray(dir.path(), &["init"]).status.success());
    assert!(codexray(dir.path(), &["index", "--quiet"]).status.success());

    let output = codexray(dir.path(), &["query", "find_me"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("find_me"));
}

#[test]
fn status_reports_symbol_count_after_index() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.rs"), "fn a() {}\nfn b() { a(); }\n").unwrap();

    codexray(dir.path(), &["init"]);
    codexray(dir.path(), &["index", "--quiet"]);

    let output = codexray(dir.path(), &["status"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("symbols"));
}

#[test]
fn hooks_install_then_remove_round_trips() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    std::fs::create_dir(dir.path().join(".git/hooks")).unwrap();

    assert!(codexray(dir.path(), &["hooks", "install"]).status.success());
    let hook_path = dir.path().join(".git/hooks/pre-commit");
    assert!(hook_path.exists());
    let content = std::fs::read_to_string(&hook_path).unwrap();
    assert!(content.contains("codexray sync"));

    assert!(codexray(dir.path(), &["hooks", "remove"]).status.success());
    assert!(!hook_path.exists());
}

#[test]
fn reset_clears_the_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.rs"), "fn a() {}\n").unwrap();

    codexray(dir.path(), &["init"]);
    codexray(dir.path(), &["index", "--quiet"]);
    assert!(codexray(dir.path(), &["reset"]).status.success());

    let output = codexray(dir.path(), &["query", "a"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("No matches"));
}
