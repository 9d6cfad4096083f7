//! MCP server implementation for the address book.
//!
//! This module provides the MCP protocol server that exposes the contacts
//! layer to AI assistants through the Model Context Protocol.

pub mod handlers;

pub use handlers::AddressBookMcpServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the address book MCP server with stdio transport.
///
/// This function starts the MCP server and runs it until completion.
/// It communicates via stdin/stdout using the MCP protocol.
pub async fn run_server(server: AddressBookMcpServer) -> Result<()> {
    // Serve the server with stdio transport
    let service = server.serve(stdio()).await?;

    // Wait for completion
    service.waiting().await?;

    Ok(())
}
