//! Request metrics
//!
//! Emitted through the `metrics` facade; without an installed recorder every
//! call is a no-op.
//!
//! - `sheets_api_requests_total` (counter): labels `method`, `status`
//! - `sheets_api_errors_total` (counter): label `kind`
//! - `sheets_token_refreshes_total` (counter)

use crate::error::ErrorKind;

/// Record one HTTP exchange with the Sheets API (every attempt counts).
pub fn record_request(method: &str, status: u16) {
    metrics::counter!(
        "sheets_api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a call that ended in an error, labelled by its classification.
pub fn record_error(kind: ErrorKind) {
    metrics::counter!("sheets_api_errors_total", "kind" => kind.label()).increment(1);
}

/// Record a token refresh triggered by a 401.
pub fn record_token_refresh() {
    metrics::counter!("sheets_token_refreshes_total").increment(1);
}
