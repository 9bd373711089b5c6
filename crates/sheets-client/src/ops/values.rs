//! `spreadsheets.values` resource

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::client::{SheetsClient, range_path, require_items, require_str, spreadsheet_path};
use crate::error::{ApiError, Result};
use crate::models::{
    AppendValuesResponse, BatchClearValuesByDataFilterResponse, BatchClearValuesResponse,
    BatchGetValuesByDataFilterResponse, BatchGetValuesResponse,
    BatchUpdateValuesByDataFilterResponse, BatchUpdateValuesResponse, ClearValuesResponse,
    UpdateValuesResponse, ValueRange,
};
use crate::ops::DataFiltersArgs;
use crate::request::{ApiRequest, JsonBody};

/// How written input is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueInputOption {
    /// Stored as-is
    Raw,
    /// Parsed as if typed into the UI (formulas, dates, numbers)
    #[default]
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }

    /// `None` → default (`USER_ENTERED`); anything present must parse.
    pub fn resolve(value: Option<&str>) -> Result<Self> {
        value.map_or(Ok(Self::default()), str::parse)
    }
}

impl FromStr for ValueInputOption {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RAW" => Ok(ValueInputOption::Raw),
            "USER_ENTERED" => Ok(ValueInputOption::UserEntered),
            _ => Err(ApiError::validation(
                "value_input_option must be 'RAW' or 'USER_ENTERED'",
            )),
        }
    }
}

impl fmt::Display for ValueInputOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValuesGetArgs {
    pub spreadsheet_id: String,
    pub range: String,
    pub major_dimension: Option<String>,
    pub value_render_option: Option<String>,
    pub date_time_render_option: Option<String>,
}

/// Arguments for `values_update` and `values_append`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValuesWriteArgs {
    pub spreadsheet_id: String,
    pub range: String,
    pub values: Vec<Vec<Value>>,
    pub value_input_option: Option<String>,
    pub major_dimension: Option<String>,
    /// Append only: `OVERWRITE` or `INSERT_ROWS`
    pub insert_data_option: Option<String>,
    pub include_values_in_response: Option<bool>,
    pub response_value_render_option: Option<String>,
    pub response_date_time_render_option: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RangeArgs {
    pub spreadsheet_id: String,
    pub range: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RangesArgs {
    pub spreadsheet_id: String,
    pub ranges: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValuesBatchGetArgs {
    pub spreadsheet_id: String,
    pub ranges: Vec<String>,
    pub major_dimension: Option<String>,
    pub value_render_option: Option<String>,
    pub date_time_render_option: Option<String>,
}

/// Arguments for `values_batch_update` and `values_batch_update_by_data_filter`.
/// `data` holds `ValueRange` or `DataFilterValueRange` objects respectively.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValuesBatchUpdateArgs {
    pub spreadsheet_id: String,
    pub data: Vec<Value>,
    pub value_input_option: Option<String>,
    pub include_values_in_response: Option<bool>,
    pub response_value_render_option: Option<String>,
    pub response_date_time_render_option: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValuesByDataFilterArgs {
    pub spreadsheet_id: String,
    pub data_filters: Vec<Value>,
    pub major_dimension: Option<String>,
    pub value_render_option: Option<String>,
    pub date_time_render_option: Option<String>,
}

impl ValuesWriteArgs {
    fn validate(&self) -> Result<ValueInputOption> {
        require_str(&self.spreadsheet_id, "spreadsheet_id")?;
        require_str(&self.range, "range")?;
        require_items(&self.values, "values")?;
        ValueInputOption::resolve(self.value_input_option.as_deref())
    }

    fn into_request(self, request: ApiRequest, option: ValueInputOption) -> ApiRequest {
        let body = JsonBody::new()
            .set("values", self.values)
            .set_str("majorDimension", self.major_dimension.as_deref())
            .build();
        request
            .query("valueInputOption", option)
            .query_opt("includeValuesInResponse", self.include_values_in_response)
            .query_opt(
                "responseValueRenderOption",
                self.response_value_render_option.as_deref(),
            )
            .query_opt(
                "responseDateTimeRenderOption",
                self.response_date_time_render_option.as_deref(),
            )
            .json(body)
    }
}

impl ValuesBatchUpdateArgs {
    fn into_body(self) -> Result<(String, Value)> {
        require_str(&self.spreadsheet_id, "spreadsheet_id")?;
        require_items(&self.data, "data")?;
        let option = ValueInputOption::resolve(self.value_input_option.as_deref())?;

        let body = JsonBody::new()
            .set("data", self.data)
            .set("valueInputOption", option.as_str())
            .set_opt("includeValuesInResponse", self.include_values_in_response)
            .set_str(
                "responseValueRenderOption",
                self.response_value_render_option.as_deref(),
            )
            .set_str(
                "responseDateTimeRenderOption",
                self.response_date_time_render_option.as_deref(),
            )
            .build();
        Ok((self.spreadsheet_id, body))
    }
}

impl SheetsClient {
    pub async fn values_get(&self, args: ValuesGetArgs) -> Result<ValueRange> {
        require_str(&args.spreadsheet_id, "spreadsheet_id")?;
        require_str(&args.range, "range")?;

        let request = ApiRequest::get(range_path(&args.spreadsheet_id, &args.range))
            .query_opt("majorDimension", args.major_dimension.as_deref())
            .query_opt("valueRenderOption", args.value_render_option.as_deref())
            .query_opt(
                "dateTimeRenderOption",
                args.date_time_render_option.as_deref(),
            );
        self.call(request).await
    }

    pub async fn values_update(&self, args: ValuesWriteArgs) -> Result<UpdateValuesResponse> {
        let option = args.validate()?;
        let request = ApiRequest::put(range_path(&args.spreadsheet_id, &args.range));
        self.call(args.into_request(request, option)).await
    }

    /// Append rows after the table found at `range`.
    pub async fn values_append(&self, args: ValuesWriteArgs) -> Result<AppendValuesResponse> {
        let option = args.validate()?;
        let path = format!("{}:append", range_path(&args.spreadsheet_id, &args.range));
        let request =
            ApiRequest::post(path).query_opt("insertDataOption", args.insert_data_option.as_deref());
        self.call(args.into_request(request, option)).await
    }

    pub async fn values_clear(&self, args: RangeArgs) -> Result<ClearValuesResponse> {
        require_str(&args.spreadsheet_id, "spreadsheet_id")?;
        require_str(&args.range, "range")?;

        let path = format!("{}:clear", range_path(&args.spreadsheet_id, &args.range));
        self.call(ApiRequest::post(path).json(JsonBody::new().build()))
            .await
    }

    pub async fn values_batch_get(&self, args: ValuesBatchGetArgs) -> Result<BatchGetValuesResponse> {
        require_str(&args.spreadsheet_id, "spreadsheet_id")?;
        require_items(&args.ranges, "ranges")?;

        let path = format!("{}/values:batchGet", spreadsheet_path(&args.spreadsheet_id));
        let request = ApiRequest::get(path)
            .query_each("ranges", &args.ranges)
            .query_opt("majorDimension", args.major_dimension.as_deref())
            .query_opt("valueRenderOption", args.value_render_option.as_deref())
            .query_opt(
                "dateTimeRenderOption",
                args.date_time_render_option.as_deref(),
            );
        self.call(request).await
    }

    pub async fn values_batch_update(
        &self,
        args: ValuesBatchUpdateArgs,
    ) -> Result<BatchUpdateValuesResponse> {
        let (spreadsheet_id, body) = args.into_body()?;
        let path = format!("{}/values:batchUpdate", spreadsheet_path(&spreadsheet_id));
        self.call(ApiRequest::post(path).json(body)).await
    }

    pub async fn values_batch_clear(&self, args: RangesArgs) -> Result<BatchClearValuesResponse> {
        require_str(&args.spreadsheet_id, "spreadsheet_id")?;
        require_items(&args.ranges, "ranges")?;

        let path = format!("{}/values:batchClear", spreadsheet_path(&args.spreadsheet_id));
        let body = JsonBody::new().set("ranges", args.ranges).build();
        self.call(ApiRequest::post(path).json(body)).await
    }

    pub async fn values_batch_get_by_data_filter(
        &self,
        args: ValuesByDataFilterArgs,
    ) -> Result<BatchGetValuesByDataFilterResponse> {
        require_str(&args.spreadsheet_id, "spreadsheet_id")?;
        require_items(&args.data_filters, "data_filters")?;

        let body = JsonBody::new()
            .set("dataFilters", args.data_filters)
            .set_str("majorDimension", args.major_dimension.as_deref())
            .set_str("valueRenderOption", args.value_render_option.as_deref())
            .set_str(
                "dateTimeRenderOption",
                args.date_time_render_option.as_deref(),
            )
            .build();

        let path = format!(
            "{}/values:batchGetByDataFilter",
            spreadsheet_path(&args.spreadsheet_id)
        );
        self.call(ApiRequest::post(path).json(body)).await
    }

    pub async fn values_batch_update_by_data_filter(
        &self,
        args: ValuesBatchUpdateArgs,
    ) -> Result<BatchUpdateValuesByDataFilterResponse> {
        let (spreadsheet_id, body) = args.into_body()?;
        let path = format!(
            "{}/values:batchUpdateByDataFilter",
            spreadsheet_path(&spreadsheet_id)
        );
        self.call(ApiRequest::post(path).json(body)).await
    }

    pub async fn values_batch_clear_by_data_filter(
        &self,
        args: DataFiltersArgs,
    ) -> Result<BatchClearValuesByDataFilterResponse> {
        require_str(&args.spreadsheet_id, "spreadsheet_id")?;
        require_items(&args.data_filters, "data_filters")?;

        let path = format!(
            "{}/values:batchClearByDataFilter",
            spreadsheet_path(&args.spreadsheet_id)
        );
        let body = JsonBody::new()
            .set("dataFilters", args.data_filters)
            .build();
        self.call(ApiRequest::post(path).json(body)).await
    }
}
