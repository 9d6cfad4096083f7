//! MCP tool handlers for the address book server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::actions::ContactAction;
use crate::domain::ContactId;
use crate::models::{Contact, ContactDraft};
use crate::services::ContactService;
use crate::validation::ValidationResult;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server exposing the shared address book.
#[derive(Clone)]
pub struct AddressBookMcpServer {
    contact_service: Arc<dyn ContactService>,
    tool_router: ToolRouter<Self>,
}

// Implement ServerHandler using the tool_handler macro
#[tool_handler]
impl ServerHandler for AddressBookMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "address-book-mcp-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MCP server over a shared address book - list, search, inspect, create and delete contacts.".into()),
        }
    }
}

// Helper structs for tool parameters
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListContactsParams {
    /// Case-insensitive name or literal phone substring
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ContactIdParams {
    pub contact_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ContactDraftParams {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ContactDraftParams {
    fn to_draft(&self) -> ContactDraft {
        ContactDraft::new(
            self.name.as_str(),
            self.phone.as_deref().unwrap_or(""),
            self.email.as_deref().unwrap_or(""),
        )
    }
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn parse_contact_id(raw: &str) -> Result<ContactId, McpError> {
    raw.parse::<ContactId>().map_err(|_| McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::from(format!("Invalid contact id: '{}'", raw)),
        data: None,
    })
}

/// JSON form of a contact with its avatar and available actions.
pub fn contact_json(contact: &Contact) -> serde_json::Value {
    let color = contact.color();
    let actions: serde_json::Map<String, serde_json::Value> = ContactAction::available(contact)
        .into_iter()
        .map(|(action, uri)| (action.as_str().to_string(), serde_json::Value::String(uri)))
        .collect();

    serde_json::json!({
        "id": contact.id,
        "name": contact.name,
        "phone": contact.phone,
        "email": contact.email,
        "initial": contact.initial(),
        "color": {
            "name": color.name(),
            "hex": color.hex(),
        },
        "actions": actions,
    })
}

fn validation_json(result: &ValidationResult) -> serde_json::Value {
    serde_json::json!({
        "submittable": result.is_submittable(),
        "fields": result,
        "errors": result.errors().iter().map(|(field, message)| {
            serde_json::json!({ "field": field, "message": message })
        }).collect::<Vec<_>>(),
    })
}

fn json_result(value: &serde_json::Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(to_mcp_error)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

// Tool router implementation
#[tool_router]
impl AddressBookMcpServer {
    /// Create a new address book MCP server.
    pub fn new(contact_service: Arc<dyn ContactService>) -> Self {
        Self {
            contact_service,
            tool_router: Self::tool_router(),
        }
    }

    /// List contacts sorted by name, optionally filtered.
    #[tool(
        description = "List contacts sorted by display name. An optional query keeps contacts whose name contains it (case-insensitive) or whose phone number contains it literally."
    )]
    pub async fn list_contacts(
        &self,
        params: Parameters<ListContactsParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = params.0.query.unwrap_or_default();

        let contacts = self
            .contact_service
            .list_contacts(&query)
            .await
            .map_err(to_mcp_error)?;

        json_result(&serde_json::json!({
            "query": query,
            "count": contacts.len(),
            "contacts": contacts.iter().map(contact_json).collect::<Vec<_>>(),
        }))
    }

    /// Retrieve one contact by ID.
    #[tool(description = "Retrieve one contact by ID, including avatar color and dial/message/email links")]
    pub async fn get_contact(
        &self,
        params: Parameters<ContactIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = parse_contact_id(&params.0.contact_id)?;

        let contact = self
            .contact_service
            .get_contact(id)
            .await
            .map_err(to_mcp_error)?;

        json_result(&contact_json(&contact))
    }

    /// Check a contact draft without saving it.
    #[tool(
        description = "Check a contact draft without saving it. Reports per-field errors and whether the draft can be submitted."
    )]
    pub async fn validate_contact(
        &self,
        params: Parameters<ContactDraftParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.contact_service.validate_draft(&params.0.to_draft());
        json_result(&validation_json(&result))
    }

    /// Create a contact with an optional phone and email.
    #[tool(
        description = "Create a contact. Name is required; phone may contain digits, +, - and spaces; email must be a valid address. Nothing is written if validation fails."
    )]
    pub async fn create_contact(
        &self,
        params: Parameters<ContactDraftParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        tracing::info!("MCP Handler: create_contact called");
        tracing::debug!(
            "Parameters: name_len={}, phone={:?}, email={:?}",
            params.name.len(),
            params.phone,
            params.email
        );

        self.contact_service
            .create_contact(&params.to_draft())
            .await
            .map_err(|e| {
                tracing::error!("Failed to create contact: {}", e);
                to_mcp_error(e)
            })?;

        let contacts = self.contact_service.contacts().await;
        json_result(&serde_json::json!({
            "created": true,
            "count": contacts.len(),
        }))
    }

    /// Delete a contact by ID.
    #[tool(description = "Delete a contact by ID. Deleting an unknown ID succeeds without changes.")]
    pub async fn delete_contact(
        &self,
        params: Parameters<ContactIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = parse_contact_id(&params.0.contact_id)?;

        tracing::info!("MCP Handler: delete_contact called for {}", id);

        self.contact_service
            .delete_contact(id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete contact {}: {}", id, e);
                to_mcp_error(e)
            })?;

        json_result(&serde_json::json!({
            "deleted": id,
            "count": self.contact_service.contacts().await.len(),
        }))
    }
}
