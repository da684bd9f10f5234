//! Common error types shared across crates.

use thiserror::Error;

/// Boxed cause attached to failures reported by the key-management service.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Caller-input faults detected before any call to the key-management service.
///
/// Every variant maps to `400 Bad Request`. These are never retried and never
/// logged as server faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required form field was absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The key resource name does not belong to the configured key ring, or
    /// its short name contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid key resource name: {0}")]
    InvalidFormat(&'static str),

    /// The key short name exceeds the allowed length.
    #[error("key name is {len} characters long; at most {max} are allowed")]
    NameTooLong { len: usize, max: usize },

    /// The plaintext is at or above the size limit.
    #[error("plaintext is {len} bytes; it must be smaller than {limit} bytes")]
    PayloadTooLarge { len: usize, limit: usize },
}

impl ValidationError {
    /// Short machine-readable code sent in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::InvalidFormat(_) => "invalid_format",
            ValidationError::NameTooLong { .. } => "name_too_long",
            ValidationError::PayloadTooLarge { .. } => "payload_too_large",
        }
    }
}

/// Faults originating from the external key-management service: network,
/// authentication, permission, not-found or quota.
///
/// The cause is kept for logging and is never sent to callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Listing crypto keys under the configured key ring failed.
    #[error("failed to list crypto keys")]
    ListKeys(#[source] BoxError),

    /// The encrypt call was rejected or could not be completed.
    #[error("encrypt request failed")]
    Encrypt(#[source] BoxError),
}

/// Outcome of a failed encryption request.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`EncryptError::Rejected`] → 400
/// - [`EncryptError::Failed`] → 500
#[derive(Debug, Error)]
pub enum EncryptError {
    /// The request was refused before reaching the key-management service.
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    /// The key-management service failed to encrypt.
    #[error(transparent)]
    Failed(#[from] ServiceError),
}

impl EncryptError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            EncryptError::Rejected(_) => 400,
            EncryptError::Failed(_) => 500,
        }
    }

    /// Short machine-readable code sent in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            EncryptError::Rejected(e) => e.code(),
            EncryptError::Failed(_) => "service_error",
        }
    }

    /// Message safe to expose to callers. Service failures are reported
    /// generically so upstream details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            EncryptError::Rejected(e) => e.to_string(),
            EncryptError::Failed(_) => "encryption failed".into(),
        }
    }
}
