//! Native Docker hosts
//!
//! A native host is a daemon reachable through the standard Docker client
//! environment (`DOCKER_HOST`, `DOCKER_CERT_PATH`, `DOCKER_TLS_VERIFY`).
//! It is assumed to be running and is never started, stopped or removed here.

use std::path::PathBuf;
use std::sync::Arc;

use super::Host;
use super::certs::{
    self, CA_FILE_NAME, CLIENT_CERT_FILE_NAME, CLIENT_KEY_FILE_NAME, CertificatePaths, TlsIdentity,
};
use super::connection::{HostConnection, HostIdentity, LifecycleState};
use super::containers::{self, ContainerHandle, ListOptions};
use super::error::{HostError, LifecycleOperation};
use crate::docker::DaemonClient;

pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";
pub const DOCKER_CERT_PATH_ENV: &str = "DOCKER_CERT_PATH";
pub const DOCKER_TLS_VERIFY_ENV: &str = "DOCKER_TLS_VERIFY";

/// Read a variable from the process environment
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Explicit native settings; unset fields fall back to the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeSettings {
    pub endpoint: Option<String>,
    pub cert_path: Option<PathBuf>,
}

impl NativeSettings {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_cert_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cert_path = Some(path.into());
        self
    }
}

/// Fully determined native configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeConfig {
    pub endpoint: String,
    pub cert_path: PathBuf,
    pub require_tls: bool,
}

impl NativeConfig {
    /// Combine explicit settings with environment lookups
    ///
    /// Explicit values win. The TLS flag only comes from the environment and
    /// is set only by the literal value `1`. Fails when the endpoint or the
    /// certificate directory is still undefined.
    pub fn resolve(
        host: &str,
        settings: &NativeSettings,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, HostError> {
        let endpoint = settings
            .endpoint
            .clone()
            .or_else(|| env(DOCKER_HOST_ENV))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| HostError::Configuration {
                host: host.to_string(),
                reason: format!("no endpoint given and {DOCKER_HOST_ENV} is not set"),
            })?;

        let cert_path = settings
            .cert_path
            .clone()
            .or_else(|| env(DOCKER_CERT_PATH_ENV).map(PathBuf::from))
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| HostError::Configuration {
                host: host.to_string(),
                reason: format!("no certificate path given and {DOCKER_CERT_PATH_ENV} is not set"),
            })?;

        let require_tls = env(DOCKER_TLS_VERIFY_ENV).as_deref() == Some("1");

        Ok(Self {
            endpoint,
            cert_path,
            require_tls,
        })
    }

    /// Build the connection, loading the certificate directory when TLS is required
    ///
    /// A plain HTTP daemon never reads the directory, so it may be empty.
    pub fn connect(&self) -> Result<HostConnection, HostError> {
        let paths = CertificatePaths::in_directory(&self.cert_path);
        if !self.require_tls {
            return Ok(HostConnection::new(self.endpoint.clone(), paths, None));
        }

        let material = certs::locate(
            &self.cert_path,
            CA_FILE_NAME,
            Some((CLIENT_CERT_FILE_NAME, CLIENT_KEY_FILE_NAME)),
        )?;
        let client = material
            .client
            .ok_or_else(|| HostError::CertificateNotFound {
                path: paths.cert.clone(),
            })?;
        let identity = TlsIdentity {
            authority: material.authority,
            client,
        };

        Ok(HostConnection::new(self.endpoint.clone(), paths, Some(identity)))
    }
}

/// Docker daemon reached directly through configuration
pub struct NativeHost<D> {
    identity: HostIdentity,
    config: NativeConfig,
    daemon: D,
    connection: Arc<HostConnection>,
}

impl<D: DaemonClient> NativeHost<D> {
    /// Resolve a native host from settings, falling back to the process environment
    pub fn new(
        name: impl Into<String>,
        settings: &NativeSettings,
        daemon: D,
    ) -> Result<Self, HostError> {
        Self::with_env(name, settings, daemon, process_env)
    }

    /// Resolve a native host with a caller-supplied environment
    pub fn with_env(
        name: impl Into<String>,
        settings: &NativeSettings,
        daemon: D,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, HostError> {
        let identity = HostIdentity::native(name);
        let config = NativeConfig::resolve(identity.name(), settings, env)?;
        let connection = Arc::new(config.connect()?);

        tracing::info!(
            "Resolved native host {} at {} (tls={})",
            identity.name(),
            connection.endpoint(),
            connection.require_tls()
        );

        Ok(Self {
            identity,
            config,
            daemon,
            connection,
        })
    }

    pub fn config(&self) -> &NativeConfig {
        &self.config
    }

    fn not_managed(&self, operation: LifecycleOperation) -> HostError {
        HostError::InvalidState {
            host: self.identity.name().to_string(),
            operation,
        }
    }
}

impl<D: DaemonClient> Host for NativeHost<D> {
    fn identity(&self) -> &HostIdentity {
        &self.identity
    }

    fn state(&self) -> LifecycleState {
        LifecycleState::Running
    }

    fn connection(&self) -> Option<Arc<HostConnection>> {
        Some(Arc::clone(&self.connection))
    }

    /// Reload certificates from the configured directory
    fn resolve(&mut self) -> Result<(), HostError> {
        self.connection = Arc::new(self.config.connect()?);
        Ok(())
    }

    fn start(&mut self) -> Result<(), HostError> {
        Err(self.not_managed(LifecycleOperation::Start))
    }

    fn stop(&mut self) -> Result<(), HostError> {
        Err(self.not_managed(LifecycleOperation::Stop))
    }

    fn remove(&mut self, _force: bool) -> Result<(), HostError> {
        Err(self.not_managed(LifecycleOperation::Remove))
    }

    async fn list_containers(&self, options: &ListOptions) -> Vec<ContainerHandle> {
        containers::list_containers(&self.daemon, Some(&self.connection), options).await
    }

    async fn try_list_containers(
        &self,
        options: &ListOptions,
    ) -> Result<Vec<ContainerHandle>, HostError> {
        containers::try_list_containers(
            &self.daemon,
            self.identity.name(),
            Some(&self.connection),
            options,
        )
        .await
    }
}
