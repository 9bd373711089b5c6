//! Recording mock of the Sheets API for operation tests

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::http::{Method, Uri};
use common::Secret;
use nango_auth::CredentialSource;
use serde_json::Value;
use token_cache::TokenCache;
use tokio::net::TcpListener;

use crate::client::SheetsClient;
use crate::executor::RequestExecutor;

pub(crate) struct StaticToken;

impl CredentialSource for StaticToken {
    fn id(&self) -> &str {
        "static"
    }

    fn fetch_access_token(
        &self,
    ) -> Pin<Box<dyn Future<Output = nango_auth::Result<Secret<String>>> + Send + '_>> {
        Box::pin(async { Ok(Secret::new("static-token".to_string())) })
    }
}

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: Method,
    /// Raw (still percent-encoded) path
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

pub(crate) type Log = Arc<Mutex<Vec<Recorded>>>;

/// Start a mock that records every request and answers with `response`.
pub(crate) async fn recording_client(response: Value) -> (SheetsClient, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let app = Router::new().fallback(move |method: Method, uri: Uri, body: Bytes| {
        let sink = sink.clone();
        let response = response.clone();
        async move {
            sink.lock().unwrap().push(Recorded {
                method,
                path: uri.path().to_string(),
                query: uri.query().map(str::to_string),
                body: serde_json::from_slice(&body).unwrap_or(Value::Null),
            });
            axum::Json(response)
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let tokens = Arc::new(TokenCache::new(Arc::new(StaticToken)));
    let executor = RequestExecutor::new(reqwest::Client::new(), tokens)
        .with_base_url(format!("http://{addr}"));
    (SheetsClient::new(executor), log)
}

pub(crate) fn only(log: &Log) -> Recorded {
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1, "expected exactly one request, got {log:?}");
    log[0].clone()
}

pub(crate) fn none(log: &Log) {
    assert!(log.lock().unwrap().is_empty(), "expected no requests");
}
