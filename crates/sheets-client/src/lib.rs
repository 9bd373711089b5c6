//! Google Sheets v4 client over a brokered access token
//!
//! `RequestExecutor` is the authenticated request layer: it attaches the
//! cached bearer token, retries once with a refreshed token on 401, and maps
//! every failure onto `ApiError`. `SheetsClient` layers one method per Sheets
//! endpoint on top of it.
//!
//! Request lifecycle:
//! 1. Operation validates its arguments (`ValidationError`, no I/O)
//! 2. Operation builds an `ApiRequest` (method, path, query, JSON body)
//! 3. Executor fetches a token from the `TokenCache` and sends the request
//! 4. 401 on the first attempt → refresh token, resend once
//! 5. Non-2xx → classified `ApiError`; 2xx → JSON decoded into a record type

pub mod client;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod models;
pub mod ops;
pub mod request;

#[cfg(test)]
mod test_support;

pub use client::SheetsClient;
pub use error::{ApiError, ErrorKind, Result};
pub use executor::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, MAX_ATTEMPTS, RequestExecutor};
pub use request::{ApiRequest, JsonBody};
