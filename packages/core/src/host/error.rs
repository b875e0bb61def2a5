//! Host-specific error types
//!
//! Errors that can occur while resolving, driving, or storing Docker hosts.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::connection::LifecycleState;
use crate::docker::DockerError;

/// Lifecycle operation named in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOperation {
    Start,
    Stop,
    Remove,
    Inspect,
}

impl fmt::Display for LifecycleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleOperation::Start => write!(f, "start"),
            LifecycleOperation::Stop => write!(f, "stop"),
            LifecycleOperation::Remove => write!(f, "remove"),
            LifecycleOperation::Inspect => write!(f, "inspect"),
        }
    }
}

/// Errors that can occur during host operations
#[derive(Error, Debug)]
pub enum HostError {
    /// Required native configuration is missing
    #[error("Host '{host}' is not configured: {reason}")]
    Configuration { host: String, reason: String },

    /// Expected certificate file is absent
    #[error("Certificate not found: {}", .path.display())]
    CertificateNotFound { path: PathBuf },

    /// Certificate file is present but unusable
    #[error("Invalid certificate {}: {reason}", .path.display())]
    CertificateParse { path: PathBuf, reason: String },

    /// Lifecycle operation attempted on a native host
    #[error("Cannot {operation} host '{host}': native hosts are not managed by docker-host")]
    InvalidState {
        host: String,
        operation: LifecycleOperation,
    },

    /// Lifecycle operation not allowed from the current state
    #[error("Cannot {operation} host '{host}' while it is {state}")]
    IllegalTransition {
        host: String,
        operation: LifecycleOperation,
        state: LifecycleState,
    },

    /// The machine provisioner reported a failure
    #[error("Failed to {operation} host '{host}': {message}")]
    OperationFailed {
        host: String,
        operation: LifecycleOperation,
        message: String,
    },

    /// Container query against the host's daemon failed
    #[error("Docker daemon query failed for host '{host}': {source}")]
    Daemon {
        host: String,
        #[source]
        source: DockerError,
    },

    /// Host has no resolved connection (removed, or never resolved)
    #[error("Host '{0}' has no resolved connection")]
    NotConnected(String),

    /// Host not found in hosts.json
    #[error("Host not found: {0}")]
    NotFound(String),

    /// Host name is already registered in hosts.json
    #[error("Host already exists: {0}")]
    AlreadyExists(String),

    /// Failed to load hosts file
    #[error("Failed to load hosts file: {0}")]
    LoadFailed(String),

    /// Failed to save hosts file
    #[error("Failed to save hosts file: {0}")]
    SaveFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_errors_name_host_and_state() {
        let err = HostError::IllegalTransition {
            host: "dev".to_string(),
            operation: LifecycleOperation::Start,
            state: LifecycleState::Running,
        };
        assert_eq!(err.to_string(), "Cannot start host 'dev' while it is running");

        let err = HostError::InvalidState {
            host: "local".to_string(),
            operation: LifecycleOperation::Remove,
        };
        assert!(err.to_string().contains("remove host 'local'"));
    }

    #[test]
    fn certificate_errors_show_path() {
        let err = HostError::CertificateNotFound {
            path: PathBuf::from("/certs/ca.pem"),
        };
        assert!(err.to_string().contains("/certs/ca.pem"));
    }
}
