//! Errors that fail a `tools/call` at the JSON-RPC level
//!
//! Sheets API failures are not among them: those are reported inside a
//! successful response with `isError: true`.

use crate::protocol::{INVALID_PARAMS, METHOD_NOT_FOUND, SERVER_ERROR};

#[derive(Debug, thiserror::Error)]
pub enum ToolCallError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("failed to encode {tool} result: {reason}")]
    Encode { tool: String, reason: String },
}

impl ToolCallError {
    /// JSON-RPC error code for this failure
    pub fn code(&self) -> i32 {
        match self {
            ToolCallError::UnknownTool(_) => METHOD_NOT_FOUND,
            ToolCallError::InvalidArguments { .. } => INVALID_PARAMS,
            ToolCallError::Encode { .. } => SERVER_ERROR,
        }
    }
}
