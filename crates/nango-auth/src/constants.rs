//! Nango broker constants

use std::time::Duration;

/// Environment variable holding the Nango connection id.
pub const ENV_CONNECTION_ID: &str = "NANGO_CONNECTION_ID";

/// Environment variable holding the Nango integration (provider config key).
pub const ENV_INTEGRATION_ID: &str = "NANGO_INTEGRATION_ID";

/// Environment variable holding the Nango API base URL.
pub const ENV_BASE_URL: &str = "NANGO_BASE_URL";

/// Environment variable holding the Nango secret key.
pub const ENV_SECRET_KEY: &str = "NANGO_SECRET_KEY";

/// All settings a connection needs, in reporting order.
pub const REQUIRED_ENV_VARS: [&str; 4] = [
    ENV_CONNECTION_ID,
    ENV_INTEGRATION_ID,
    ENV_BASE_URL,
    ENV_SECRET_KEY,
];

/// Upper bound on a single broker round trip.
pub const BROKER_TIMEOUT: Duration = Duration::from_secs(30);
