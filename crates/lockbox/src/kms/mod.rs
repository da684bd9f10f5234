//! The external key-management collaborator.
//!
//! The core only needs two capabilities from Cloud KMS: listing the crypto keys
//! of a key ring and encrypting with one of them. Both sit behind the
//! [`KeyManagement`] trait so that request handling can be exercised without
//! network access or credentials.
//!
//! # Invariants
//!
//! - [`KeyManagement::encrypt`] accepts only a [`KeyIdentifier`], never a raw
//!   string, so client input must pass validation before it can reach KMS.
//! - Pagination and transport retries are the implementation's concern; callers
//!   see a finite list or a single [`ServiceError`].

pub mod gcp;

pub use gcp::GcpKms;

use async_trait::async_trait;
use common::ServiceError;

use crate::resource::KeyIdentifier;

/// Capabilities of the external key-management service.
///
/// Implementations are shared across concurrent requests and must be safe for
/// simultaneous use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyManagement: Send + Sync {
    /// Return the full resource names of all crypto keys under `parent` that
    /// match `filter`, draining every page.
    async fn list_crypto_keys(&self, parent: &str, filter: &str)
        -> Result<Vec<String>, ServiceError>;

    /// Encrypt `plaintext` with `key` and return the raw ciphertext bytes.
    async fn encrypt(&self, key: &KeyIdentifier, plaintext: &[u8])
        -> Result<Vec<u8>, ServiceError>;
}
