//! JSON-RPC dispatch and the stdio transport
//!
//! Request flow:
//! 1. Reader loop takes one line per message from stdin
//! 2. Each line is handled on its own task, so a slow Sheets call does not
//!    block `ping` or other tool calls
//! 3. Responses go through a channel to a single writer task, which keeps
//!    every output line whole
//! 4. EOF on stdin: wait for in-flight requests, flush, exit

use std::sync::Arc;

use anyhow::Context;
use nango_auth::BrokerClient;
use serde_json::{Value, json};
use sheets_client::{RequestExecutor, SheetsClient};
use token_cache::TokenCache;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::diagnostics::SERVER_NAME;
use crate::protocol::{
    INVALID_PARAMS, InitializeResponse, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR, ServerCapabilities, ServerInfo, ToolsCallRequest,
    ToolsCapabilities, error, success,
};
use crate::tools::{ToolContext, ToolRegistry};

const INSTRUCTIONS: &str = "Google Sheets v4 tools. Authentication is handled through a Nango \
connection; call get_server_info to check configuration and refresh_nango_token after \
re-authorizing the connection.";

pub struct Server {
    registry: ToolRegistry,
}

impl Server {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Wire broker → token cache → executor → client from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        let connection = config.connection();
        let broker =
            BrokerClient::new(http.clone(), connection.clone()).with_timeout(config.timeout());
        let tokens = Arc::new(TokenCache::new(Arc::new(broker)));
        let executor = RequestExecutor::new(http, tokens)
            .with_base_url(config.sheets.api_base_url.clone())
            .with_timeout(config.timeout());

        Ok(Self::new(ToolRegistry::new(ToolContext {
            client: SheetsClient::new(executor),
            connection,
        })))
    }

    /// Try to obtain a token before the first request. Never fails: problems
    /// are logged and authentication is retried on the first call.
    pub async fn warm_up(&self) {
        let context = self.registry.context();
        let missing = context.connection.missing_fields();
        if !missing.is_empty() {
            warn!(
                missing = %missing.join(", "),
                "missing nango settings; tool calls will fail until they are set"
            );
            return;
        }

        match context.client.executor().tokens().get_or_fetch().await {
            Ok(_) => info!("nango authentication initialized"),
            Err(e) => warn!(
                error = %e,
                "failed to initialize nango authentication; will retry on first call"
            ),
        }
    }

    /// Handle one raw input line. `None` means nothing is written back.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(error(Value::Null, PARSE_ERROR, format!("parse error: {e}"), None)),
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            debug!(method = %request.method, "notification ignored");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => encode(id, &initialize_response()),
            "tools/list" => encode(id, &self.registry.list_response()),
            "tools/call" => match serde_json::from_value::<ToolsCallRequest>(request.params) {
                Ok(call) => match self.registry.call_tool(&call.name, call.arguments).await {
                    Ok(result) => encode(id, &result),
                    Err(e) => error(id, e.code(), e.to_string(), None),
                },
                Err(e) => error(
                    id,
                    INVALID_PARAMS,
                    format!("invalid tools/call params: {e}"),
                    None,
                ),
            },
            "ping" => success(id, json!({})),
            other => error(id, METHOD_NOT_FOUND, format!("method not found: {other}"), None),
        };
        Some(response)
    }
}

fn initialize_response() -> InitializeResponse {
    InitializeResponse {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapabilities {
                list_changed: false,
            },
        },
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        instructions: INSTRUCTIONS.to_string(),
    }
}

fn encode<T: serde::Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => success(id, value),
        Err(e) => error(
            id,
            crate::protocol::SERVER_ERROR,
            format!("failed to encode result: {e}"),
            None,
        ),
    }
}

/// Serve newline-delimited JSON-RPC from `reader` to `writer` until EOF.
pub async fn serve<R, W>(server: Arc<Server>, reader: R, writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(response) = rx.recv().await {
            let mut line = serde_json::to_string(&response)?;
            line.push('\n');
            writer.write_all(line.as_bytes()).await?;
            writer.flush().await?;
        }
        anyhow::Ok(())
    });

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let server = server.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(response) = server.handle_line(line.trim()).await
                && tx.send(response).is_err()
            {
                debug!("writer closed, dropping response");
            }
        });
    }

    // Writer exits once every in-flight task has dropped its sender
    drop(tx);
    writer_task.await.context("writer task panicked")??;
    Ok(())
}
