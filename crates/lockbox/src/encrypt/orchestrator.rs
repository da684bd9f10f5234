//! [`EncryptionOrchestrator`]: validate, then encrypt through Cloud KMS.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::EncryptError;
use tracing::debug;

use super::guard;
use crate::kms::KeyManagement;
use crate::resource::{self, KeyRingPath};

/// Ciphertext bytes exactly as returned by Cloud KMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext(pub Vec<u8>);

impl Ciphertext {
    /// Standard-alphabet, padded base64 of the ciphertext, as sent to clients.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }
}

/// Runs one encryption request end to end.
#[derive(Clone)]
pub struct EncryptionOrchestrator {
    kms: Arc<dyn KeyManagement>,
    ring: Arc<KeyRingPath>,
}

impl EncryptionOrchestrator {
    pub fn new(kms: Arc<dyn KeyManagement>, ring: Arc<KeyRingPath>) -> Self {
        Self { kms, ring }
    }

    /// Check the plaintext, validate the key name, then encrypt.
    ///
    /// The key candidate only reaches Cloud KMS as a validated
    /// [`KeyIdentifier`](crate::resource::KeyIdentifier); a rejected request
    /// makes no outbound call.
    ///
    /// # Errors
    ///
    /// [`EncryptError::Rejected`] for input faults, [`EncryptError::Failed`] if
    /// Cloud KMS returns an error. No partial ciphertext is ever returned.
    pub async fn encrypt(
        &self,
        key_candidate: &str,
        plaintext: &[u8],
    ) -> Result<Ciphertext, EncryptError> {
        guard::check(plaintext)?;
        let key = resource::validate(key_candidate, &self.ring)?;

        debug!(key = key.short_name(), bytes = plaintext.len(), "encrypting");
        let ciphertext = self.kms.encrypt(&key, plaintext).await?;
        Ok(Ciphertext(ciphertext))
    }
}
