//! Configuration loading and validation for the lockbox service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::resource::KeyRingPath;

/// Validated service configuration. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Google Cloud project that owns the key ring. **Required.**
    #[serde(rename = "google_cloud_project", default)]
    pub project_id: String,

    /// Cloud KMS location of the key ring.
    #[serde(rename = "kms_location", default = "default_location")]
    pub location: String,

    /// Name of the key ring whose keys are offered to users.
    #[serde(rename = "kms_key_ring", default = "default_key_ring")]
    pub key_ring: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP collector endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_location() -> String {
    "us".into()
}
fn default_key_ring() -> String {
    "lockboxkms".into()
}
fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}

impl ServiceConfig {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::default())
    }

    /// Load and validate configuration from the given environment source.
    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: ServiceConfig = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The key ring every request is confined to.
    pub fn key_ring_path(&self) -> KeyRingPath {
        KeyRingPath::new(&self.project_id, &self.location, &self.key_ring)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_segment(&self.project_id, "GOOGLE_CLOUD_PROJECT")?;
        ensure_segment(&self.location, "KMS_LOCATION")?;
        ensure_segment(&self.key_ring, "KMS_KEY_RING")?;

        if self.port == 0 {
            anyhow::bail!("PORT must be > 0");
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            if endpoint.trim().is_empty() {
                anyhow::bail!("OTEL_EXPORTER_OTLP_ENDPOINT must not be blank when set");
            }
        }
        Ok(())
    }
}

/// Resource-name segments must be present and must not introduce extra path levels.
fn ensure_segment(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    if value.contains('/') {
        anyhow::bail!("{name} must be a single resource-name segment (no '/')");
    }
    Ok(())
}
