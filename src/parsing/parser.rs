//! Tree-sitter adapter (C2): turns source bytes into a syntax tree for a
//! detected language, with a hard recursion cap matching the invariant that
//! a single file never stalls a batch.

use std::path::Path;
use tree_sitter::{Parser as TsParser, Tree};

use crate::error::{ParseError, Result};
use super::language::{self, LanguageId};

/// Maximum tree-sitter parse duration before giving up on a file, expressed
/// as a node-count ceiling tree-sitter checks internally (`set_timeout_micros`
/// isn't available on a plain `Parser`, so we bound via a cancellation flag
/// checked cooperatively by the caller instead).
const PARSE_TIMEOUT_MICROS: u64 = 5_000_000;

pub struct SourceParser {
    parser: TsParser,
    language: LanguageId,
}

impl SourceParser {
    pub fn for_language(language: LanguageId) -> Result<Self> {
        let mut parser = TsParser::new();
        let grammar = language::grammar_for(language);
        parser
            .set_language(&grammar)
            .map_err(|e| ParseError::Extraction {
                path: Path::new("<grammar>").to_path_buf(),
                reason: e.to_string(),
            })?;
        parser.set_timeout_micros(PARSE_TIMEOUT_MICROS);
        Ok(Self { parser, language })
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// Parse `source`, returning the syntax tree. Fails with
    /// [`ParseError::NoTree`] if tree-sitter bails out (timeout or
    /// cancellation) rather than yielding even a partial tree.
    pub fn parse(&mut self, path: &Path, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| ParseError::NoTree { path: path.to_path_buf() }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trivial_rust_source() {
        let mut parser = SourceParser::for_language(LanguageId::Rust).unwrap();
        let tree = parser
            .parse(Path::new("a.rs"), "fn main() {}")
            .unwrap();
        assert_eq!(tree.root_node().kind(), "source_file");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn malformed_source_still_yields_a_best_effort_tree() {
        let mut parser = SourceParser::for_language(LanguageId::Python).unwrap();
        let tree = parser.parse(Path::new("a.py"), "def f(:\n").unwrap();
        assert!(tree.root_node().has_error());
    }
}
