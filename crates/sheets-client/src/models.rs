//! Response records for the Sheets v4 API
//!
//! Permissive on input: every field is optional and unknown fields are
//! ignored, so a partial or evolving response still decodes. Deeply nested
//! structures the server only passes through (grid data, formats, filters)
//! stay as raw JSON values. Unset fields are left out when re-serialized.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spreadsheet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SpreadsheetProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheets: Option<Vec<Sheet>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_ranges: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_metadata: Option<Vec<DeveloperMetadata>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_sources: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source_schedules: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpreadsheetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_recalc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterative_calculation_settings: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_theme: Option<Value>,
}

/// One tab of a spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sheet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merges: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditional_formats: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_views: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected_ranges: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banded_ranges: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_metadata: Option<Vec<DeveloperMetadata>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_groups: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_groups: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchUpdateSpreadsheetResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_spreadsheet: Option<Box<Spreadsheet>>,
}

/// A rectangle of cell values. Cells are strings, numbers, booleans or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Vec<Value>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateValuesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_rows: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_columns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_cells: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_data: Option<ValueRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppendValuesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    /// Range of the table the values were appended to, before the append
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updates: Option<UpdateValuesResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClearValuesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared_range: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchGetValuesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_ranges: Option<Vec<ValueRange>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchUpdateValuesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_updated_rows: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_updated_columns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_updated_cells: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_updated_sheets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<UpdateValuesResponse>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchClearValuesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared_ranges: Option<Vec<String>>,
}

/// A value range together with the data filters that selected it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchedValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_range: Option<ValueRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_filters: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchGetValuesByDataFilterResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_ranges: Option<Vec<MatchedValueRange>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchUpdateValuesByDataFilterResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_updated_rows: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_updated_columns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_updated_cells: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_updated_sheets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchClearValuesByDataFilterResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared_ranges: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeveloperMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchDeveloperMetadataResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_developer_metadata: Option<Vec<Value>>,
}
