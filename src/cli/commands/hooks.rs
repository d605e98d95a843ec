//! `hooks`: manage a git pre-commit hook that runs `codexray sync --quiet`
//! so the store never drifts far behind a commit.
//!
//! The hook's own install wizard is out of scope here; this only writes or
//! removes the small shell script.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const MARKER: &str = "# codexray sync hook";
const SCRIPT: &str = "#!/bin/sh\n# codexray sync hook\ncodexray sync --quiet\n";

fn hook_path(root: &Path) -> PathBuf {
    root.join(".git").join("hooks").join("pre-commit")
}

pub fn install(root: &Path) -> Result<()> {
    let git_dir = root.join(".git");
    if !git_dir.is_dir() {
        return Err(Error::General(format!("'{}' is not a git repository", root.display())));
    }

    let path = hook_path(root);
    if let Ok(existing) = std::fs::read_to_string(&path) {
        if existing.contains(MARKER) {
            println!("Hook already installed");
            return Ok(());
        }
    }

    std::fs::create_dir_all(path.parent().unwrap())?;
    std::fs::write(&path, SCRIPT)?;
    set_executable(&path)?;

    println!("Installed pre-commit hook at {}", path.display());
    Ok(())
}

pub fn remove(root: &Path) -> Result<()> {
    let path = hook_path(root);
    match std::fs::read_to_string(&path) {
        Ok(content) if content.contains(MARKER) => {
            std::fs::remove_file(&path)?;
            println!("Removed pre-commit hook");
        }
        Ok(_) => println!("pre-commit hook exists but was not installed by codexray; leaving it in place"),
        Err(_) => println!("No hook installed"),
    }
    Ok(())
}

pub fn status(root: &Path) -> Result<()> {
    let path = hook_path(root);
    match std::fs::read_to_string(&path) {
        Ok(content) if content.contains(MARKER) => println!("installed"),
        Ok(_) => println!("a different pre-commit hook is installed"),
        Err(_) => println!("not installed"),
    }
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
