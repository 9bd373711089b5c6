//! Diagnostic tools
//!
//! These never fail at the protocol level: problems are described in the
//! returned object (`success: false`) so an operator can read them.

use serde_json::{Map, Value, json};
use sheets_client::ops::CreateSpreadsheetArgs;
use tracing::{error, info};

use crate::tools::ToolContext;

pub const SERVER_NAME: &str = "Google Sheets API v4 MCP Server";
pub const TEST_SPREADSHEET_TITLE: &str = "MCP Nango Connection Test";

/// Server identity, auth status and which Nango settings are present.
/// Setting values are never included, only their presence.
pub async fn server_info(ctx: &ToolContext, tool_names: Vec<String>) -> Value {
    let executor = ctx.client.executor();
    let auth_configured = executor.tokens().get_or_fetch().await.is_ok();

    let settings: Map<String, Value> = ctx
        .connection
        .presence()
        .into_iter()
        .map(|(name, present)| (name.to_lowercase(), Value::Bool(present)))
        .collect();

    json!({
        "server_name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "base_url": executor.base_url(),
        "auth_method": "nango_oauth",
        "auth_configured": auth_configured,
        "environment_variables": settings,
        "available_tools": tool_names,
    })
}

/// Create a throwaway spreadsheet to prove the whole chain works.
pub async fn test_connection(ctx: &ToolContext) -> Value {
    let args = CreateSpreadsheetArgs {
        title: Some(TEST_SPREADSHEET_TITLE.to_string()),
        ..Default::default()
    };

    match ctx.client.spreadsheets_create(args).await {
        Ok(spreadsheet) => {
            info!(
                spreadsheet_id = ?spreadsheet.spreadsheet_id,
                "connection test succeeded"
            );
            json!({
                "success": true,
                "message": "Connection test successful with Nango authentication",
                "test_spreadsheet_id": spreadsheet.spreadsheet_id,
                "test_spreadsheet_url": spreadsheet.spreadsheet_url,
                "note": "A test spreadsheet was created to verify the Nango connection",
            })
        }
        Err(e) => {
            error!(error = %e, "connection test failed");
            json!({
                "success": false,
                "error": format!("Connection test failed: {e}"),
                "message": "Please check your Nango configuration and try again",
            })
        }
    }
}

/// Discard the cached token and fetch a new one.
pub async fn refresh_token(ctx: &ToolContext) -> Value {
    match ctx.client.executor().tokens().refresh(None).await {
        Ok(token) => json!({
            "success": true,
            "message": "Token refreshed successfully from Nango",
            "token_length": token.len(),
            "refresh_time": chrono::Utc::now().to_rfc3339(),
        }),
        Err(e) => {
            error!(error = %e, "token refresh failed");
            json!({
                "success": false,
                "error": format!("Nango token refresh failed: {e}"),
                "message": "Please check your Nango configuration",
            })
        }
    }
}
