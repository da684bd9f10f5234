//! Key listing: which symmetric keys a user may choose from.
//!
//! Every call goes to Cloud KMS; nothing is cached, so keys added or disabled
//! upstream show up on the next listing.

use std::sync::Arc;

use common::protocol::KeyOption;
use common::ServiceError;
use tracing::debug;

use crate::kms::KeyManagement;
use crate::resource::KeyRingPath;

/// Cloud KMS list filter selecting symmetric encrypt/decrypt keys.
pub const SYMMETRIC_PURPOSE_FILTER: &str = "purpose:ENCRYPT_DECRYPT";

/// A listed key: its full resource name and the label shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub full_name: String,
    pub short_name: String,
}

impl KeyDescriptor {
    /// Derive the descriptor from a full resource name. The short name is the
    /// substring after the last `/`.
    pub fn from_full_name(full_name: String) -> Self {
        let short_name = match full_name.rfind('/') {
            Some(i) => full_name[i + 1..].to_owned(),
            None => full_name.clone(),
        };
        Self {
            full_name,
            short_name,
        }
    }
}

impl From<KeyDescriptor> for KeyOption {
    fn from(d: KeyDescriptor) -> Self {
        KeyOption {
            name: d.full_name,
            short_name: d.short_name,
        }
    }
}

/// Lists the symmetric keys of the configured key ring.
#[derive(Clone)]
pub struct KeyRegistry {
    kms: Arc<dyn KeyManagement>,
    ring: Arc<KeyRingPath>,
}

impl KeyRegistry {
    pub fn new(kms: Arc<dyn KeyManagement>, ring: Arc<KeyRingPath>) -> Self {
        Self { kms, ring }
    }

    /// Fetch the current keys, sorted by short name for a stable display order.
    ///
    /// # Errors
    ///
    /// Returns the [`ServiceError`] reported by Cloud KMS unchanged; no retry is
    /// attempted here.
    pub async fn list_keys(&self) -> Result<Vec<KeyDescriptor>, ServiceError> {
        let names = self
            .kms
            .list_crypto_keys(self.ring.as_str(), SYMMETRIC_PURPOSE_FILTER)
            .await?;

        let mut keys: Vec<KeyDescriptor> =
            names.into_iter().map(KeyDescriptor::from_full_name).collect();
        keys.sort_by(|a, b| {
            a.short_name
                .cmp(&b.short_name)
                .then_with(|| a.full_name.cmp(&b.full_name))
        });

        debug!(key_ring = %self.ring, count = keys.len(), "key listing complete");
        Ok(keys)
    }
}
