//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::encrypt::EncryptionOrchestrator;
use crate::kms::KeyManagement;
use crate::registry::KeyRegistry;
use crate::resource::KeyRingPath;

/// Application state shared across all request handlers.
///
/// Both components hold the same `Arc`-shared KMS client and key ring, so
/// Axum's per-request clone copies only reference counts.
#[derive(Clone)]
pub struct AppState {
    /// Lists selectable keys.
    pub registry: KeyRegistry,
    /// Validates and encrypts.
    pub orchestrator: EncryptionOrchestrator,
}

impl AppState {
    /// Wire both components to one KMS client and the configured key ring.
    pub fn new(kms: Arc<dyn KeyManagement>, ring: KeyRingPath) -> Self {
        let ring = Arc::new(ring);
        Self {
            registry: KeyRegistry::new(Arc::clone(&kms), Arc::clone(&ring)),
            orchestrator: EncryptionOrchestrator::new(kms, ring),
        }
    }
}
