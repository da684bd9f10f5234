//! [`GcpKms`]: Cloud KMS client bound to the [`KeyManagement`] trait.

use anyhow::{Context, Result};
use async_trait::async_trait;
use common::ServiceError;
use google_cloud_gax::paginator::ItemPaginator as _;
use google_cloud_kms_v1::client::KeyManagementService;
use tracing::debug;

use super::KeyManagement;
use crate::resource::KeyIdentifier;

/// Long-lived Cloud KMS client.
///
/// The underlying client is cheaply cloneable and safe for concurrent use, so a
/// single instance serves every request. Credentials are resolved once, through
/// Application Default Credentials, when the client is built.
#[derive(Clone, Debug)]
pub struct GcpKms {
    client: KeyManagementService,
}

impl GcpKms {
    /// Build the Cloud KMS client.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials cannot be resolved or the transport
    /// cannot be initialised.
    pub async fn connect() -> Result<Self> {
        let client = KeyManagementService::builder()
            .build()
            .await
            .context("failed to create Cloud KMS client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl KeyManagement for GcpKms {
    async fn list_crypto_keys(
        &self,
        parent: &str,
        filter: &str,
    ) -> Result<Vec<String>, ServiceError> {
        let mut items = self
            .client
            .list_crypto_keys()
            .set_parent(parent)
            .set_filter(filter)
            .by_item();

        let mut names = Vec::new();
        while let Some(item) = items.next().await {
            let key = item.map_err(|e| ServiceError::ListKeys(Box::new(e)))?;
            names.push(key.name);
        }
        debug!(%parent, count = names.len(), "listed crypto keys");
        Ok(names)
    }

    async fn encrypt(
        &self,
        key: &KeyIdentifier,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, ServiceError> {
        let resp = self
            .client
            .encrypt()
            .set_name(key.as_str())
            .set_plaintext(plaintext.to_vec())
            .send()
            .await
            .map_err(|e| ServiceError::Encrypt(Box::new(e)))?;
        Ok(resp.ciphertext.to_vec())
    }
}
