//! End-to-end: Nango broker mock → token cache → executor → Sheets mock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, put};
use nango_auth::{BrokerClient, ConnectionDescriptor};
use serde_json::{Value, json};
use sheets_client::ops::{ValuesGetArgs, ValuesWriteArgs};
use sheets_client::{ErrorKind, RequestExecutor, SheetsClient};
use token_cache::TokenCache;
use tokio::net::TcpListener;

#[derive(Default)]
struct World {
    broker_calls: AtomicU64,
    /// Token the Sheets mock accepts; empty accepts the first one it sees
    valid_token: Mutex<String>,
    cells: Mutex<HashMap<String, Value>>,
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn start_broker(world: Arc<World>) -> String {
    let app = Router::new()
        .route(
            "/connection/{id}",
            get(|State(world): State<Arc<World>>| async move {
                let n = world.broker_calls.fetch_add(1, Ordering::SeqCst) + 1;
                axum::Json(json!({
                    "connection_id": "conn-1",
                    "credentials": {"type": "OAUTH2", "access_token": format!("ya29.{n}")}
                }))
            }),
        )
        .with_state(world);
    serve(app).await
}

fn authorized(world: &World, headers: &HeaderMap) -> bool {
    let presented = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();
    let mut valid = world.valid_token.lock().unwrap();
    if valid.is_empty() {
        *valid = presented.clone();
    }
    *valid == presented
}

async fn start_sheets(world: Arc<World>) -> String {
    let app = Router::new()
        .route(
            "/v4/spreadsheets/{id}/values/{range}",
            put(
                |State(world): State<Arc<World>>,
                 Path((id, range)): Path<(String, String)>,
                 headers: HeaderMap,
                 axum::Json(body): axum::Json<Value>| async move {
                    if !authorized(&world, &headers) {
                        return (
                            StatusCode::UNAUTHORIZED,
                            axum::Json(json!({"error": {"message": "Invalid Credentials"}})),
                        );
                    }
                    let values = body["values"].clone();
                    let rows = values.as_array().map_or(0, Vec::len);
                    world.cells.lock().unwrap().insert(range.clone(), values);
                    (
                        StatusCode::OK,
                        axum::Json(json!({
                            "spreadsheetId": id,
                            "updatedRange": range,
                            "updatedRows": rows
                        })),
                    )
                },
            )
            .get(
                |State(world): State<Arc<World>>,
                 Path((_id, range)): Path<(String, String)>,
                 headers: HeaderMap| async move {
                    if !authorized(&world, &headers) {
                        return (
                            StatusCode::UNAUTHORIZED,
                            axum::Json(json!({"error": {"message": "Invalid Credentials"}})),
                        );
                    }
                    match world.cells.lock().unwrap().get(&range) {
                        Some(values) => (
                            StatusCode::OK,
                            axum::Json(json!({
                                "range": range,
                                "majorDimension": "ROWS",
                                "values": values
                            })),
                        ),
                        None => (
                            StatusCode::NOT_FOUND,
                            axum::Json(json!({"error": {"message": "Requested entity was not found."}})),
                        ),
                    }
                },
            ),
        )
        .with_state(world);
    serve(app).await
}

async fn client_for(world: Arc<World>) -> SheetsClient {
    let broker_url = start_broker(world.clone()).await;
    let sheets_url = start_sheets(world).await;

    let http = reqwest::Client::new();
    let broker = BrokerClient::new(
        http.clone(),
        ConnectionDescriptor::new("conn-1", "google-sheet", broker_url, "sk-test"),
    );
    let tokens = Arc::new(TokenCache::new(Arc::new(broker)));
    SheetsClient::new(RequestExecutor::new(http, tokens).with_base_url(sheets_url))
}

fn grid() -> Vec<Vec<Value>> {
    vec![vec![json!("a"), json!("b")], vec![json!(1), json!(2)]]
}

#[tokio::test]
async fn written_values_read_back_unchanged() {
    let world = Arc::new(World::default());
    let client = client_for(world.clone()).await;

    let updated = client
        .values_update(ValuesWriteArgs {
            spreadsheet_id: "sheet-1".into(),
            range: "Sheet1!A1:B2".into(),
            values: grid(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.updated_rows, Some(2));

    let read = client
        .values_get(ValuesGetArgs {
            spreadsheet_id: "sheet-1".into(),
            range: "Sheet1!A1:B2".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(read.values, Some(grid()));
    assert_eq!(world.broker_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn revoked_token_is_replaced_transparently() {
    let world = Arc::new(World::default());
    let client = client_for(world.clone()).await;

    client
        .values_update(ValuesWriteArgs {
            spreadsheet_id: "sheet-1".into(),
            range: "A1".into(),
            values: vec![vec![json!("x")]],
            ..Default::default()
        })
        .await
        .unwrap();

    // Upstream now only honours the token the broker will issue next
    *world.valid_token.lock().unwrap() = "ya29.2".to_string();

    let read = client
        .values_get(ValuesGetArgs {
            spreadsheet_id: "sheet-1".into(),
            range: "A1".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(read.values, Some(vec![vec![json!("x")]]));
    assert_eq!(world.broker_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn missing_range_is_not_found() {
    let world = Arc::new(World::default());
    let client = client_for(world).await;

    let err = client
        .values_get(ValuesGetArgs {
            spreadsheet_id: "sheet-1".into(),
            range: "Nowhere!A1".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    assert_eq!(err.status(), Some(404));
    assert_eq!(
        err.message(),
        "Resource not found: Requested entity was not found."
    );
}

#[tokio::test]
async fn incomplete_connection_fails_with_authentication_error() {
    let world = Arc::new(World::default());
    let sheets_url = start_sheets(world.clone()).await;

    let http = reqwest::Client::new();
    let broker = BrokerClient::new(
        http.clone(),
        ConnectionDescriptor::new("", "google-sheet", "http://127.0.0.1:9", ""),
    );
    let tokens = Arc::new(TokenCache::new(Arc::new(broker)));
    let client = SheetsClient::new(RequestExecutor::new(http, tokens).with_base_url(sheets_url));

    let err = client
        .values_get(ValuesGetArgs {
            spreadsheet_id: "sheet-1".into(),
            range: "A1".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(
        err.message(),
        "Missing required environment variables: NANGO_CONNECTION_ID, NANGO_SECRET_KEY"
    );
    assert!(world.cells.lock().unwrap().is_empty());
}
