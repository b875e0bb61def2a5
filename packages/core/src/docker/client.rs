//! Docker client wrapper with connection handling
//!
//! Connects a bollard client to a resolved [`HostConnection`], using the
//! host's certificate files when the daemon requires TLS.

use bollard::{API_DEFAULT_VERSION, Docker};

use super::error::DockerError;
use crate::host::HostConnection;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Docker client wrapper bound to one host connection
pub struct DockerClient {
    inner: Docker,
}

impl DockerClient {
    /// Connect to the daemon described by `connection`
    ///
    /// TLS-verified hosts use the connection's CA, client certificate and key
    /// files; other hosts are reached over plain HTTP at the same endpoint.
    pub fn connect(connection: &HostConnection, timeout_secs: u64) -> Result<Self, DockerError> {
        tracing::debug!(
            "Connecting to {} (tls={})",
            connection.endpoint(),
            connection.require_tls()
        );

        let docker = if connection.require_tls() {
            Docker::connect_with_ssl(
                connection.endpoint(),
                connection.client_key_path(),
                connection.client_certificate_path(),
                connection.ca_certificate_path(),
                timeout_secs,
                API_DEFAULT_VERSION,
            )
            .map_err(|e| DockerError::Tls(e.to_string()))?
        } else {
            Docker::connect_with_http(connection.endpoint(), timeout_secs, API_DEFAULT_VERSION)
                .map_err(|e| DockerError::Connection(e.to_string()))?
        };

        Ok(Self { inner: docker })
    }

    /// Query the daemon's version, e.g. "Docker 24.0.7 (API 1.43)"
    pub async fn version(&self) -> Result<String, DockerError> {
        let version = self.inner.version().await.map_err(DockerError::from)?;

        let version_str = format!(
            "Docker {} (API {})",
            version.version.unwrap_or_else(|| "unknown".to_string()),
            version.api_version.unwrap_or_else(|| "unknown".to_string())
        );

        Ok(version_str)
    }

    /// Access inner Bollard client for advanced operations
    pub fn inner(&self) -> &Docker {
        &self.inner
    }
}
