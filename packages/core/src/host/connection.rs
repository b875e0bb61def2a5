//! Resolved host state
//!
//! Identity, lifecycle state and connection parameters shared by native
//! and managed hosts.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use openssl::x509::X509;
use serde::{Deserialize, Serialize};

use super::certs::{self, CertificatePaths, ClientCertificate, TlsIdentity};
use super::error::HostError;

/// Last observed run state of a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Running,
    Stopped,
    Removed,
    /// Provisioner reported an error or a state this crate does not model
    Unknown,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::Stopped => write!(f, "stopped"),
            LifecycleState::Removed => write!(f, "removed"),
            LifecycleState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Immutable identity of a host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    name: String,
    is_native: bool,
}

impl HostIdentity {
    pub fn native(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_native: true,
        }
    }

    pub fn managed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_native: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_native(&self) -> bool {
        self.is_native
    }
}

/// How to reach a Docker daemon
///
/// Built in one step from an endpoint, a TLS flag, certificate paths and the
/// material loaded from them, so paths and certificates always describe the
/// same files. Certificates are only loaded when the daemon requires TLS; a
/// plain HTTP connection keeps the paths but never reads them.
/// Hosts hold it behind an `Arc` and swap the whole value on re-resolution.
#[derive(Debug, Clone)]
pub struct HostConnection {
    endpoint: String,
    require_tls: bool,
    paths: CertificatePaths,
    identity: Option<TlsIdentity>,
    resolved_at: DateTime<Utc>,
}

impl HostConnection {
    /// Build a connection, loading certificates from `paths` if TLS is required
    pub(crate) fn load(
        endpoint: impl Into<String>,
        require_tls: bool,
        paths: CertificatePaths,
    ) -> Result<Self, HostError> {
        let identity = if require_tls {
            Some(certs::load_identity(&paths)?)
        } else {
            None
        };
        Ok(Self::new(endpoint, paths, identity))
    }

    /// Build a connection from already loaded material
    ///
    /// TLS is required exactly when `identity` is present.
    pub(crate) fn new(
        endpoint: impl Into<String>,
        paths: CertificatePaths,
        identity: Option<TlsIdentity>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            require_tls: identity.is_some(),
            paths,
            identity,
            resolved_at: Utc::now(),
        }
    }

    /// Daemon address, e.g. `tcp://192.168.99.100:2376`
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn require_tls(&self) -> bool {
        self.require_tls
    }

    pub fn ca_certificate_path(&self) -> &Path {
        &self.paths.ca
    }

    pub fn client_certificate_path(&self) -> &Path {
        &self.paths.cert
    }

    pub fn client_key_path(&self) -> &Path {
        &self.paths.key
    }

    pub fn certificate_paths(&self) -> &CertificatePaths {
        &self.paths
    }

    /// Loaded CA certificate; `None` on plain HTTP connections
    pub fn ca_certificate(&self) -> Option<&X509> {
        self.identity.as_ref().map(|identity| &identity.authority)
    }

    /// Loaded client certificate; `None` on plain HTTP connections
    pub fn client_certificate(&self) -> Option<&ClientCertificate> {
        self.identity.as_ref().map(|identity| &identity.client)
    }

    /// When this connection was resolved
    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }
}
