//! `spreadsheets` resource

use serde::Deserialize;
use serde_json::Value;

use crate::client::{SheetsClient, require_items, require_str, spreadsheet_path};
use crate::error::Result;
use crate::models::{BatchUpdateSpreadsheetResponse, Spreadsheet};
use crate::request::{ApiRequest, JsonBody};

pub const DEFAULT_SPREADSHEET_TITLE: &str = "Untitled spreadsheet";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateSpreadsheetArgs {
    /// Absent → `DEFAULT_SPREADSHEET_TITLE`; an explicit empty title is rejected
    pub title: Option<String>,
    pub locale: Option<String>,
    pub auto_recalc: Option<String>,
    pub time_zone: Option<String>,
    /// Initial `Sheet` objects
    pub sheets: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetSpreadsheetArgs {
    pub spreadsheet_id: String,
    pub ranges: Option<Vec<String>>,
    pub include_grid_data: Option<bool>,
    /// Field mask, e.g. `properties.title,sheets.properties`
    pub fields: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpreadsheetBatchUpdateArgs {
    pub spreadsheet_id: String,
    pub requests: Vec<Value>,
    pub include_spreadsheet_in_response: Option<bool>,
    pub response_ranges: Option<Vec<String>>,
    pub response_include_grid_data: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpreadsheetByDataFilterArgs {
    pub spreadsheet_id: String,
    pub data_filters: Vec<Value>,
    pub include_grid_data: Option<bool>,
}

impl SheetsClient {
    /// Create a spreadsheet and return it as created.
    pub async fn spreadsheets_create(&self, args: CreateSpreadsheetArgs) -> Result<Spreadsheet> {
        let title = args.title.as_deref().unwrap_or(DEFAULT_SPREADSHEET_TITLE);
        require_str(title, "title")?;

        let properties = JsonBody::new()
            .set("title", title)
            .set_str("locale", args.locale.as_deref())
            .set_str("autoRecalc", args.auto_recalc.as_deref())
            .set_str("timeZone", args.time_zone.as_deref())
            .build();
        let body = JsonBody::new()
            .set("properties", properties)
            .set_opt("sheets", args.sheets.filter(|s| !s.is_empty()))
            .build();

        self.call(ApiRequest::post("/v4/spreadsheets").json(body))
            .await
    }

    pub async fn spreadsheets_get(&self, args: GetSpreadsheetArgs) -> Result<Spreadsheet> {
        require_str(&args.spreadsheet_id, "spreadsheet_id")?;

        let request = ApiRequest::get(spreadsheet_path(&args.spreadsheet_id))
            .query_each("ranges", args.ranges.unwrap_or_default())
            .query_opt("includeGridData", args.include_grid_data)
            .query_opt("fields", args.fields.as_deref());
        self.call(request).await
    }

    /// Apply a list of `Request` objects atomically.
    pub async fn spreadsheets_batch_update(
        &self,
        args: SpreadsheetBatchUpdateArgs,
    ) -> Result<BatchUpdateSpreadsheetResponse> {
        require_str(&args.spreadsheet_id, "spreadsheet_id")?;
        require_items(&args.requests, "requests")?;

        let body = JsonBody::new()
            .set("requests", args.requests)
            .set_opt(
                "includeSpreadsheetInResponse",
                args.include_spreadsheet_in_response,
            )
            .set_opt(
                "responseRanges",
                args.response_ranges.filter(|r| !r.is_empty()),
            )
            .set_opt("responseIncludeGridData", args.response_include_grid_data)
            .build();

        let path = format!("{}:batchUpdate", spreadsheet_path(&args.spreadsheet_id));
        self.call(ApiRequest::post(path).json(body)).await
    }

    pub async fn spreadsheets_get_by_data_filter(
        &self,
        args: SpreadsheetByDataFilterArgs,
    ) -> Result<Spreadsheet> {
        require_str(&args.spreadsheet_id, "spreadsheet_id")?;
        require_items(&args.data_filters, "data_filters")?;

        let body = JsonBody::new()
            .set("dataFilters", args.data_filters)
            .set_opt("includeGridData", args.include_grid_data)
            .build();

        let path = format!("{}:getByDataFilter", spreadsheet_path(&args.spreadsheet_id));
        self.call(ApiRequest::post(path).json(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::{none, only, recording_client};
    use axum::http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn create_defaults_title_and_omits_unset_properties() {
        let (client, log) = recording_client(json!({
            "spreadsheetId": "new-id",
            "properties": {"title": "Untitled spreadsheet"}
        }))
        .await;

        let created = client
            .spreadsheets_create(CreateSpreadsheetArgs::default())
            .await
            .unwrap();

        assert_eq!(created.spreadsheet_id.as_deref(), Some("new-id"));
        let request = only(&log);
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/v4/spreadsheets");
        assert_eq!(
            request.body,
            json!({"properties": {"title": "Untitled spreadsheet"}})
        );
    }

    #[tokio::test]
    async fn create_sends_optional_properties_and_sheets() {
        let (client, log) = recording_client(json!({})).await;

        client
            .spreadsheets_create(CreateSpreadsheetArgs {
                title: Some("Budget".into()),
                locale: Some("fr_FR".into()),
                time_zone: Some("Europe/Paris".into()),
                sheets: Some(vec![json!({"properties": {"title": "Q1"}})]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            only(&log).body,
            json!({
                "properties": {"title": "Budget", "locale": "fr_FR", "timeZone": "Europe/Paris"},
                "sheets": [{"properties": {"title": "Q1"}}]
            })
        );
    }

    #[tokio::test]
    async fn create_rejects_explicit_empty_title() {
        let (client, log) = recording_client(json!({})).await;
        let err = client
            .spreadsheets_create(CreateSpreadsheetArgs {
                title: Some(String::new()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "title is required");
        none(&log);
    }

    #[tokio::test]
    async fn get_without_id_fails_before_any_request() {
        let (client, log) = recording_client(json!({})).await;
        let err = client
            .spreadsheets_get(GetSpreadsheetArgs::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "spreadsheet_id is required");
        none(&log);
    }

    #[tokio::test]
    async fn get_maps_options_to_query() {
        let (client, log) = recording_client(json!({"spreadsheetId": "abc"})).await;

        client
            .spreadsheets_get(GetSpreadsheetArgs {
                spreadsheet_id: "abc".into(),
                ranges: Some(vec!["A1:B2".into(), "C3".into()]),
                include_grid_data: Some(true),
                fields: None,
            })
            .await
            .unwrap();

        let request = only(&log);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/v4/spreadsheets/abc");
        assert_eq!(
            request.query.as_deref(),
            Some("ranges=A1%3AB2&ranges=C3&includeGridData=true")
        );
    }

    #[tokio::test]
    async fn batch_update_requires_requests() {
        let (client, log) = recording_client(json!({})).await;
        let err = client
            .spreadsheets_batch_update(SpreadsheetBatchUpdateArgs {
                spreadsheet_id: "abc".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.message(), "requests is required");
        none(&log);
    }

    #[tokio::test]
    async fn batch_update_posts_requests_and_flags() {
        let (client, log) = recording_client(json!({
            "spreadsheetId": "abc",
            "replies": [{}]
        }))
        .await;

        let response = client
            .spreadsheets_batch_update(SpreadsheetBatchUpdateArgs {
                spreadsheet_id: "abc".into(),
                requests: vec![json!({"addSheet": {"properties": {"title": "New"}}})],
                include_spreadsheet_in_response: Some(false),
                response_ranges: Some(vec![]),
                response_include_grid_data: None,
            })
            .await
            .unwrap();

        assert_eq!(response.replies.map(|r| r.len()), Some(1));
        let request = only(&log);
        assert_eq!(request.path, "/v4/spreadsheets/abc:batchUpdate");
        assert_eq!(
            request.body,
            json!({
                "requests": [{"addSheet": {"properties": {"title": "New"}}}],
                "includeSpreadsheetInResponse": false
            })
        );
    }

    #[tokio::test]
    async fn get_by_data_filter_posts_filters() {
        let (client, log) = recording_client(json!({"spreadsheetId": "abc"})).await;

        client
            .spreadsheets_get_by_data_filter(SpreadsheetByDataFilterArgs {
                spreadsheet_id: "abc".into(),
                data_filters: vec![json!({"a1Range": "Sheet1!A1:A5"})],
                include_grid_data: Some(true),
            })
            .await
            .unwrap();

        let request = only(&log);
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/v4/spreadsheets/abc:getByDataFilter");
        assert_eq!(
            request.body,
            json!({"dataFilters": [{"a1Range": "Sheet1!A1:A5"}], "includeGridData": true})
        );
    }

    #[test]
    fn args_deserialize_from_tool_arguments() {
        let args: GetSpreadsheetArgs = serde_json::from_value(json!({
            "spreadsheet_id": "abc",
            "include_grid_data": false
        }))
        .unwrap();
        assert_eq!(args.spreadsheet_id, "abc");
        assert_eq!(args.include_grid_data, Some(false));
        assert!(args.ranges.is_none());
    }
}
