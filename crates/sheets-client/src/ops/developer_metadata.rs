//! `spreadsheets.developerMetadata` resource

use serde::Deserialize;

use crate::client::{SheetsClient, require_items, require_str, spreadsheet_path};
use crate::error::{ApiError, Result};
use crate::models::{DeveloperMetadata, SearchDeveloperMetadataResponse};
use crate::ops::DataFiltersArgs;
use crate::request::{ApiRequest, JsonBody};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeveloperMetadataGetArgs {
    pub spreadsheet_id: String,
    /// Zero is treated as unset
    pub metadata_id: i64,
}

impl SheetsClient {
    pub async fn developer_metadata_get(
        &self,
        args: DeveloperMetadataGetArgs,
    ) -> Result<DeveloperMetadata> {
        require_str(&args.spreadsheet_id, "spreadsheet_id")?;
        if args.metadata_id == 0 {
            return Err(ApiError::required("metadata_id"));
        }

        let path = format!(
            "{}/developerMetadata/{}",
            spreadsheet_path(&args.spreadsheet_id),
            args.metadata_id
        );
        self.call(ApiRequest::get(path)).await
    }

    pub async fn developer_metadata_search(
        &self,
        args: DataFiltersArgs,
    ) -> Result<SearchDeveloperMetadataResponse> {
        require_str(&args.spreadsheet_id, "spreadsheet_id")?;
        require_items(&args.data_filters, "data_filters")?;

        let path = format!(
            "{}/developerMetadata:search",
            spreadsheet_path(&args.spreadsheet_id)
        );
        let body = JsonBody::new()
            .set("dataFilters", args.data_filters)
            .build();
        self.call(ApiRequest::post(path).json(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{none, only, recording_client};
    use axum::http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn get_uses_numeric_id_in_path() {
        let (client, log) = recording_client(json!({
            "metadataId": 42,
            "metadataKey": "owner",
            "metadataValue": "finance",
            "visibility": "DOCUMENT"
        }))
        .await;

        let metadata = client
            .developer_metadata_get(DeveloperMetadataGetArgs {
                spreadsheet_id: "abc".into(),
                metadata_id: 42,
            })
            .await
            .unwrap();

        assert_eq!(metadata.metadata_id, Some(42));
        assert_eq!(metadata.metadata_key.as_deref(), Some("owner"));
        let request = only(&log);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/v4/spreadsheets/abc/developerMetadata/42");
    }

    #[tokio::test]
    async fn get_rejects_zero_id() {
        let (client, log) = recording_client(json!({})).await;
        let err = client
            .developer_metadata_get(DeveloperMetadataGetArgs {
                spreadsheet_id: "abc".into(),
                metadata_id: 0,
            })
            .await
            .unwrap_err();

        assert_eq!(err.message(), "metadata_id is required");
        none(&log);
    }

    #[tokio::test]
    async fn search_posts_filters() {
        let (client, log) = recording_client(json!({
            "matchedDeveloperMetadata": [{"developerMetadata": {"metadataId": 1}}]
        }))
        .await;

        let response = client
            .developer_metadata_search(DataFiltersArgs {
                spreadsheet_id: "abc".into(),
                data_filters: vec![json!({"developerMetadataLookup": {"metadataId": 1}})],
            })
            .await
            .unwrap();

        assert_eq!(response.matched_developer_metadata.unwrap().len(), 1);
        let request = only(&log);
        assert_eq!(request.path, "/v4/spreadsheets/abc/developerMetadata:search");
        assert_eq!(
            request.body,
            json!({"dataFilters": [{"developerMetadataLookup": {"metadataId": 1}}]})
        );
    }
}
