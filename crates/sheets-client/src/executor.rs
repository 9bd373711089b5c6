//! Authenticated request execution
//!
//! Attaches the cached bearer token, sends the request and classifies the
//! outcome. A 401 on the first attempt triggers exactly one token refresh
//! and resend; the loop is bounded by `MAX_ATTEMPTS`, so a second 401 is
//! reported as an `AuthenticationError` rather than retried again.

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::Secret;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use token_cache::TokenCache;
use tracing::{debug, instrument, warn};

use crate::error::{ApiError, Result};
use crate::metrics;
use crate::request::ApiRequest;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Initial attempt plus one retry after a token refresh
pub const MAX_ATTEMPTS: u32 = 2;

pub struct RequestExecutor {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    tokens: Arc<TokenCache>,
}

impl RequestExecutor {
    pub fn new(http: reqwest::Client, tokens: Arc<TokenCache>) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            tokens,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    /// Execute one logical call.
    ///
    /// Returns the decoded body: `Null` for an empty body, the parsed JSON
    /// value, or `{"content": <text>}` when the body is not JSON.
    #[instrument(
        skip_all,
        fields(
            request_id = %format!("req_{}", uuid::Uuid::new_v4().as_simple()),
            method = %request.method,
            path = %request.path,
        )
    )]
    pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let started = Instant::now();
        let result = self.run(&request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => debug!(elapsed_ms, "sheets request completed"),
            Err(e) => {
                metrics::record_error(e.kind());
                warn!(
                    elapsed_ms,
                    kind = e.kind().label(),
                    status = ?e.status(),
                    error = %e,
                    "sheets request failed"
                );
            }
        }
        result
    }

    async fn run(&self, request: &ApiRequest) -> Result<Value> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), request.path);
        let mut headers = request.headers.clone();

        // Caller-supplied credentials go out verbatim on the first attempt; a
        // 401 replaces them with a managed token like any other
        let mut token = None;
        if !request.has_caller_authorization() {
            let current = self.tokens.get_or_fetch().await?;
            headers.insert(AUTHORIZATION, bearer(&current)?);
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            token = Some(current);
        }

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            let response = self.send(request, &url, headers.clone()).await?;
            let status = response.status();
            metrics::record_request(request.method.as_str(), status.as_u16());

            if status == StatusCode::UNAUTHORIZED && attempt < MAX_ATTEMPTS {
                warn!(attempt, "access token rejected, refreshing");
                metrics::record_token_refresh();
                let fresh = self.tokens.refresh(token.as_ref()).await?;
                headers.insert(AUTHORIZATION, bearer(&fresh)?);
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                token = Some(fresh);
                continue;
            }
            break response;
        };

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::transport(&e))?;
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(decode_body(&body))
    }

    async fn send(
        &self,
        request: &ApiRequest,
        url: &str,
        headers: HeaderMap,
    ) -> Result<reqwest::Response> {
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(headers)
            .timeout(self.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder.send().await.map_err(|e| ApiError::transport(&e))
    }
}

fn bearer(token: &Secret<String>) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose())).map_err(|e| {
        ApiError::authentication(format!("access token is not a valid header value: {e}"))
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Empty → `Null`; JSON → parsed; anything else → `{"content": text}`.
pub fn decode_body(body: &str) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| json!({ "content": body }))
}
