//! Deterministic token normalization shared by the keyword index, the TF-IDF
//! indexer, and query normalization (both of them must agree bit-for-bit or
//! search results drift from what was indexed).

use std::collections::HashSet;
use std::sync::OnceLock;

const MIN_TOKEN_LEN: usize = 2;
const MAX_TOKEN_LEN: usize = 39;

/// Base English stop-words plus programming-noise words, per the spec's
/// §4.3 list. Shared by indexing and plain search normalization.
fn base_stop_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| {
        [
            // Articles, pronouns, auxiliaries
            "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "it", "its",
            "this", "that", "these", "those", "he", "she", "they", "we", "you", "i", "do",
            "does", "did", "has", "have", "had", "can", "could", "will", "would", "should",
            "shall", "may", "might", "must", "of", "in", "on", "at", "to", "for", "with", "and",
            "or", "but", "if", "as", "by", "from", "not", "no",
            // Programming-noise words
            "get", "set", "let", "var", "const", "return", "void", "null", "true", "false",
            "undefined", "import", "export", "from", "require", "function", "class",
            "interface", "type", "enum", "struct",
        ]
        .into_iter()
        .collect()
    })
}

/// Extra stop-words for natural-language task queries fed to the context
/// builder (§4.9) - imperative verbs that carry no retrieval signal.
fn context_extra_stop_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| {
        [
            "fix", "add", "create", "make", "build", "implement", "change", "update", "modify",
            "write", "code", "file", "files", "method",
        ]
        .into_iter()
        .collect()
    })
}

/// Tokenize `text` for indexing / plain search (base stop-word set).
pub fn tokenize(text: &str) -> Vec<String> {
    tokenize_with_stop_words(text, base_stop_words(), None)
}

/// Tokenize a natural-language task query for the context builder, using the
/// extended stop-word set (base + imperative task verbs).
pub fn tokenize_context_query(text: &str) -> Vec<String> {
    tokenize_with_stop_words(text, base_stop_words(), Some(context_extra_stop_words()))
}

fn tokenize_with_stop_words(
    text: &str,
    stop_words: &HashSet<&'static str>,
    extra_stop_words: Option<&HashSet<&'static str>>,
) -> Vec<String> {
    let split = split_on_boundaries(text);

    split
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .filter(|w| len_in_bounds(w))
        .filter(|w| !stop_words.contains(w.as_str()))
        .filter(|w| !extra_stop_words.is_some_and(|set| set.contains(w.as_str())))
        .collect()
}

fn len_in_bounds(w: &str) -> bool {
    let len = w.chars().count();
    len >= MIN_TOKEN_LEN && len <= MAX_TOKEN_LEN
}

/// Step 1+2 of the pipeline: camelCase boundary splitting and separator
/// replacement, producing a whitespace-delimited string ready for
/// `split_whitespace` + lowercasing.
fn split_on_boundaries(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev_lower = false;

    for ch in text.chars() {
        match ch {
            '_' | '-' | '.' | '/' | '\\' | ':' => {
                out.push(' ');
                prev_lower = false;
                continue;
            }
            _ => {}
        }

        if ch.is_uppercase() && prev_lower {
            out.push(' ');
        }
        out.push(ch);
        prev_lower = ch.is_lowercase();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_camel_case() {
        assert_eq!(tokenize("authenticateUser"), vec!["authenticate", "user"]);
    }

    #[test]
    fn replaces_separators() {
        assert_eq!(
            tokenize("user_profile-settings.view"),
            vec!["user", "profile", "settings", "view"]
        );
    }

    #[test]
    fn drops_stop_words_and_short_long_tokens() {
        let tokens = tokenize("the function returns a validateToken x averylongtokenthatexceedsfortycharslongxxxxxxxxxxxxxxxxxxxx");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"function".to_string()));
        assert!(!tokens.contains(&"a".to_string()));
        assert!(!tokens.contains(&"x".to_string()));
        assert!(tokens.contains(&"validate".to_string()));
        assert!(tokens.contains(&"token".to_string()));
    }

    #[test]
    fn context_tokenizer_drops_task_verbs() {
        let tokens = tokenize_context_query("fix the authentication bug in login handler");
        assert!(!tokens.contains(&"fix".to_string()));
        assert!(tokens.contains(&"authentication".to_string()));
        assert!(tokens.contains(&"login".to_string()));
        assert!(tokens.contains(&"handler".to_string()));
    }

    #[test]
    fn tokenizer_is_idempotent_over_its_own_output() {
        let once = tokenize("authenticateUser validateToken");
        let joined = once.join(" ");
        let twice = tokenize(&joined);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_string_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }
}
