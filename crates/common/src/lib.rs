//! Shared types for the Sheets MCP gateway workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
