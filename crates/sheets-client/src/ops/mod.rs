//! Endpoint wrappers, grouped by Sheets API resource
//!
//! Each operation takes a `Deserialize` argument struct whose snake_case
//! field names match the MCP tool parameters, validates it locally, then
//! issues one executor call.

pub mod developer_metadata;
pub mod spreadsheets;
pub mod values;

use serde::Deserialize;
use serde_json::Value;

pub use developer_metadata::DeveloperMetadataGetArgs;
pub use spreadsheets::{
    CreateSpreadsheetArgs, DEFAULT_SPREADSHEET_TITLE, GetSpreadsheetArgs, SpreadsheetBatchUpdateArgs,
    SpreadsheetByDataFilterArgs,
};
pub use values::{
    RangeArgs, RangesArgs, ValueInputOption, ValuesBatchGetArgs, ValuesBatchUpdateArgs,
    ValuesByDataFilterArgs, ValuesGetArgs, ValuesWriteArgs,
};

/// A spreadsheet id plus a non-empty list of `DataFilter` objects.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataFiltersArgs {
    pub spreadsheet_id: String,
    pub data_filters: Vec<Value>,
}
