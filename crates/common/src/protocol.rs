//! Request and response types exchanged over the HTTP surface.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Urlencoded form fields of `POST /encrypt`, as a client submits them.
///
/// Both fields are optional at the wire level; an absent field is reported as
/// a missing-field validation error. The server decodes `text` as raw bytes,
/// so clients sending non-UTF-8 plaintext encode the body themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptForm {
    /// Fully-qualified key resource name chosen by the caller.
    pub key: Option<String>,
    /// Text to encrypt.
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Keys endpoint
// ---------------------------------------------------------------------------

/// One selectable key as rendered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyOption {
    /// Full resource name; the value submitted back to `POST /encrypt`.
    pub name: String,
    /// Trailing path segment used as the display label.
    pub short_name: String,
}

/// JSON body for `GET /keys` when the client asks for `application/json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyListResponse {
    pub keys: Vec<KeyOption>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"invalid_format"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
