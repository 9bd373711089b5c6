//! `SheetsClient`: typed operations over the request executor

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ErrorKind, Result};
use crate::executor::RequestExecutor;
use crate::request::ApiRequest;

/// Google Sheets v4 client. One method per endpoint lives in `crate::ops`.
pub struct SheetsClient {
    executor: RequestExecutor,
}

impl SheetsClient {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Execute and decode into `T`. A `null` body (empty response) yields
    /// `T::default()`.
    pub(crate) async fn call<T>(&self, request: ApiRequest) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let value = self.executor.execute(request).await?;
        decode(value)
    }
}

pub(crate) fn decode<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::new(ErrorKind::Api, format!("unexpected response shape: {e}")))
}

/// `/v4/spreadsheets/{id}`
pub(crate) fn spreadsheet_path(spreadsheet_id: &str) -> String {
    format!("/v4/spreadsheets/{}", urlencoding::encode(spreadsheet_id))
}

/// `/v4/spreadsheets/{id}/values/{range}`
pub(crate) fn range_path(spreadsheet_id: &str, range: &str) -> String {
    format!(
        "{}/values/{}",
        spreadsheet_path(spreadsheet_id),
        urlencoding::encode(range)
    )
}

pub(crate) fn require_str(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ApiError::required(field));
    }
    Ok(())
}

pub(crate) fn require_items<T>(items: &[T], field: &str) -> Result<()> {
    if items.is_empty() {
        return Err(ApiError::required(field));
    }
    Ok(())
}
