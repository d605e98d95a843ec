//! `serve`: start the MCP tool server on stdio.

use std::path::Path;

use rmcp::{ServiceExt, transport::stdio};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::mcp::CodeIntelligenceServer;
use crate::storage::GraphStore;

pub async fn run(root: &Path) -> Result<()> {
    Settings::load(root)?;
    let store = GraphStore::open(&Settings::db_path(root))?;
    let server = CodeIntelligenceServer::new(store, root.to_path_buf());

    eprintln!("codexray MCP server starting on stdio");

    let service = server
        .serve(stdio())
        .await
        .map_err(|e| Error::General(format!("failed to start MCP server: {e}")))?;

    service
        .waiting()
        .await
        .map_err(|e| Error::General(format!("MCP server error: {e}")))?;

    Ok(())
}
