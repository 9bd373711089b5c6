//! Single-slot access token cache
//!
//! Holds at most one bearer token for the one configured connection. Tokens
//! carry no expiry here: a token is trusted until the Sheets API rejects it
//! with 401, at which point the executor asks the cache to refresh.
//!
//! Token lifecycle:
//! 1. First `get_or_fetch()` → slot empty → fetch from the `CredentialSource`
//! 2. Later calls → cached token returned, no fetch
//! 3. Upstream 401 → `refresh(Some(rejected))` → slot replaced
//! 4. `invalidate()` → slot cleared, next `get_or_fetch()` fetches again

pub mod cache;

pub use cache::TokenCache;
