//! File discovery (§4.8): walks a project tree respecting gitignore rules,
//! user-supplied exclude globs, and a per-file size cap, yielding only files
//! whose extension is a registered language.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::config::Settings;
use crate::parsing::language_for_extension;

pub struct FileWalker {
    excludes: GlobSet,
    max_file_size: u64,
}

impl FileWalker {
    pub fn new(settings: &Settings) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in &settings.exclude {
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        let excludes = builder.build().unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap());

        Self {
            excludes,
            max_file_size: settings.max_file_size,
        }
    }

    /// Enumerate files under `root` whose extension is registered, are not
    /// excluded, and are within the size cap.
    pub fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .require_git(false);

        builder
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .filter(|path| self.is_eligible(root, path))
            .collect()
    }

    fn is_eligible(&self, root: &Path, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        if language_for_extension(extension).is_none() {
            return false;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if self.excludes.is_match(relative) {
            return false;
        }

        std::fs::metadata(path)
            .map(|m| m.len() <= self.max_file_size)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finds_registered_language_files_and_skips_others() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
        std::fs::write(dir.path().join("README.md"), "# hi").unwrap();

        let walker = FileWalker::new(&Settings::default());
        let files = walker.walk(dir.path());

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.rs"));
    }

    #[test]
    fn respects_user_exclude_globs() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("vendor")).unwrap();
        std::fs::write(dir.path().join("vendor/lib.rs"), "fn v() {}").unwrap();
        std::fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();

        let mut settings = Settings::default();
        settings.exclude = vec!["vendor/**".to_string()];
        let walker = FileWalker::new(&settings);
        let files = walker.walk(dir.path());

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.rs"));
    }

    #[test]
    fn oversized_file_is_excluded() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("big.rs"), "x".repeat(2048)).unwrap();

        let mut settings = Settings::default();
        settings.max_file_size = 1024;
        let walker = FileWalker::new(&settings);
        assert!(walker.walk(dir.path()).is_empty());
    }
}
