//! Language registry (C1): maps a file extension to a [`LanguageId`] and
//! lazily loads/caches the matching tree-sitter grammar.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// The set of languages the registry recognizes. Backed by a real
/// `tree-sitter-<lang>` grammar crate, meeting the "13+ languages" bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Php,
    Kotlin,
    Swift,
    Lua,
    GdScript,
}

impl LanguageId {
    /// The registry name used by extraction-rule 2 (`component` detection is
    /// scoped to `"typescript"`/`"javascript"`).
    pub fn registry_name(&self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript | Self::Tsx => "typescript",
            Self::Go => "go",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Php => "php",
            Self::Kotlin => "kotlin",
            Self::Swift => "swift",
            Self::Lua => "lua",
            Self::GdScript => "gdscript",
        }
    }
}

struct LanguageDescriptor {
    id: LanguageId,
    extensions: &'static [&'static str],
}

const REGISTRY: &[LanguageDescriptor] = &[
    LanguageDescriptor { id: LanguageId::Rust, extensions: &["rs"] },
    LanguageDescriptor { id: LanguageId::Python, extensions: &["py", "pyi"] },
    LanguageDescriptor { id: LanguageId::JavaScript, extensions: &["js", "jsx", "mjs", "cjs"] },
    LanguageDescriptor { id: LanguageId::TypeScript, extensions: &["ts", "mts", "cts"] },
    LanguageDescriptor { id: LanguageId::Tsx, extensions: &["tsx"] },
    LanguageDescriptor { id: LanguageId::Go, extensions: &["go"] },
    LanguageDescriptor { id: LanguageId::Java, extensions: &["java"] },
    LanguageDescriptor { id: LanguageId::C, extensions: &["c", "h"] },
    LanguageDescriptor { id: LanguageId::Cpp, extensions: &["cpp", "cc", "cxx", "hpp", "hh"] },
    LanguageDescriptor { id: LanguageId::CSharp, extensions: &["cs"] },
    LanguageDescriptor { id: LanguageId::Php, extensions: &["php"] },
    LanguageDescriptor { id: LanguageId::Kotlin, extensions: &["kt", "kts"] },
    LanguageDescriptor { id: LanguageId::Swift, extensions: &["swift"] },
    LanguageDescriptor { id: LanguageId::Lua, extensions: &["lua"] },
    LanguageDescriptor { id: LanguageId::GdScript, extensions: &["gd"] },
];

/// Detect a language from a file extension (without the leading dot).
///
/// Unknown extensions yield `None`; the caller silently skips the file.
pub fn language_for_extension(extension: &str) -> Option<LanguageId> {
    let ext = extension.to_lowercase();
    REGISTRY
        .iter()
        .find(|d| d.extensions.contains(&ext.as_str()))
        .map(|d| d.id)
}

fn grammar_cache() -> &'static Mutex<HashMap<&'static str, tree_sitter::Language>> {
    static CACHE: OnceLock<Mutex<HashMap<&'static str, tree_sitter::Language>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Lazily load and cache the tree-sitter grammar for `id`.
pub fn grammar_for(id: LanguageId) -> tree_sitter::Language {
    let key = grammar_cache_key(id);
    let mut cache = grammar_cache().lock().expect("grammar cache poisoned");
    cache
        .entry(key)
        .or_insert_with(|| load_grammar(id))
        .clone()
}

fn grammar_cache_key(id: LanguageId) -> &'static str {
    match id {
        LanguageId::Tsx => "tsx",
        other => other.registry_name(),
    }
}

fn load_grammar(id: LanguageId) -> tree_sitter::Language {
    match id {
        LanguageId::Rust => tree_sitter_rust::LANGUAGE.into(),
        LanguageId::Python => tree_sitter_python::LANGUAGE.into(),
        LanguageId::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        LanguageId::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        LanguageId::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        LanguageId::Go => tree_sitter_go::LANGUAGE.into(),
        LanguageId::Java => tree_sitter_java::LANGUAGE.into(),
        LanguageId::C => tree_sitter_c::LANGUAGE.into(),
        LanguageId::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        LanguageId::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
        LanguageId::Php => tree_sitter_php::LANGUAGE_PHP.into(),
        LanguageId::Kotlin => tree_sitter_kotlin_codanna::LANGUAGE.into(),
        LanguageId::Swift => tree_sitter_swift::LANGUAGE.into(),
        LanguageId::Lua => tree_sitter_lua::LANGUAGE.into(),
        LanguageId::GdScript => tree_sitter_gdscript::LANGUAGE.into(),
    }
}
