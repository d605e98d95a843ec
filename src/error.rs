//! Error types for the code intelligence engine.
//!
//! Structured, `thiserror`-derived errors segmented by subsystem, unified
//! behind a crate-level [`Error`] with `#[from]` conversions and
//! recovery-suggestion text for CLI-facing diagnostics.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::Node;

/// Errors raised while opening or writing to the graph store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to open store at '{path}': {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("sqlite operation failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(
        "persisted schema version {found} is older than the engine's expected version {expected}; run `reset` then `init --index` to rebuild"
    )]
    SchemaVersionMismatch { found: u32, expected: u32 },
}

/// Errors raised while parsing or extracting symbols from a single file.
///
/// Per §4.1/§7, these never abort a batch: they are recorded against the
/// offending file and indexing continues.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no registered language for extension '{extension}'")]
    UnknownExtension { extension: String },

    #[error("parser produced no syntax tree for '{path}'")]
    NoTree { path: PathBuf },

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unexpected syntax shape extracting '{path}': {reason}")]
    Extraction { path: PathBuf, reason: String },
}

/// Errors raised by MCP tool handlers.
#[derive(Error, Debug)]
pub enum McpError {
    #[error("invalid tool arguments: {reason}")]
    InvalidArguments { reason: String },

    #[error("engine not initialized at '{path}'; run `codexray init` first")]
    NotInitialized { path: PathBuf },
}

/// Top-level error type surfaced to CLI and MCP callers.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Mcp(#[from] McpError),

    #[error("'{path}' has no codexray store; run `codexray init` first")]
    NotInitialized { path: PathBuf },

    #[error(
        "ambiguous symbol '{name}': {} candidates found across distinct files; narrow with a file-path substring",
        candidates.len()
    )]
    Ambiguous { name: String, candidates: Vec<Node> },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {reason}")]
    Config { reason: String },

    #[error("{0}")]
    General(String),
}

impl Error {
    /// Short, actionable recovery hints for CLI-facing diagnostics.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Storage(StorageError::SchemaVersionMismatch { .. }) => vec![
                "run `codexray reset` to clear the persisted store",
                "then `codexray init --index` to rebuild from scratch",
            ],
            Self::Storage(_) => vec![
                "check disk space and permissions in the .codexray directory",
                "run `codexray index --force` to rebuild the index",
            ],
            Self::NotInitialized { .. } | Self::Mcp(McpError::NotInitialized { .. }) => {
                vec!["run `codexray init` in this directory first"]
            }
            Self::Ambiguous { .. } => {
                vec!["pass a file-path substring to disambiguate the symbol"]
            }
            _ => vec![],
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Sqlite(e))
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_carries_reset_guidance() {
        let err = Error::Storage(StorageError::SchemaVersionMismatch {
            found: 1,
            expected: 2,
        });
        assert!(err.recovery_suggestions().iter().any(|s| s.contains("reset")));
    }
}
