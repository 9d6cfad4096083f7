//! Address Book MCP Server - Main entry point
//!
//! This is the main executable for the address book server, which provides a Model
//! Context Protocol (MCP) interface to a shared contacts store.

use address_book_mcp_server::repositories::{ContactRepository, StoreContactRepository};
use address_book_mcp_server::services::{ContactService, ContactServiceImpl};
use address_book_mcp_server::{
    AddressBookMcpServer, Config, ContactsStore, FileContactsStore, MemoryContactsStore, Metrics,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration before logging so LOG_LEVEL from .env applies
    let config = Config::from_env();

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let default_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize the contacts store
    let store: Arc<dyn ContactsStore> = match &config.store_path {
        Some(path) => Arc::new(FileContactsStore::open(path)?),
        None => {
            warn!("ADDRESS_BOOK_STORE_PATH not set; contacts will not outlive this process");
            Arc::new(MemoryContactsStore::new())
        }
    };

    let metrics = Metrics::new();
    let repository = Arc::new(
        StoreContactRepository::new(store, config.permissions.clone())
            .with_selection(config.selection)
            .with_metrics(metrics.clone()),
    ) as Arc<dyn ContactRepository>;

    let service = Arc::new(ContactServiceImpl::new(repository)) as Arc<dyn ContactService>;

    // A failed first load is not fatal; every tool call refreshes again
    match service.refresh().await {
        Ok(contacts) => info!("Loaded {} contacts", contacts.len()),
        Err(e) => warn!("Initial contact load failed: {}", e),
    }

    let server = AddressBookMcpServer::new(service);
    info!(
        "Address book MCP server initialized (selection: {})",
        config.selection
    );

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    address_book_mcp_server::server::run_server(server).await?;

    info!("Store metrics at shutdown: {:?}", metrics.summary());
    info!("Address book MCP server shutdown complete");
    Ok(())
}
