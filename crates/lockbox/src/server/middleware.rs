//! Limits applied by the router's middleware layers.

use std::time::Duration;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest accepted request body. A maximal plaintext can triple in size when
/// urlencoded, so this sits well above the plaintext limit.
pub const MAX_BODY_BYTES: usize = 256 * 1024;
