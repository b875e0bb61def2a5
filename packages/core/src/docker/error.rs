//! Docker-specific error types
//!
//! Errors raised while talking to a host's Docker daemon, with clear
//! messages for the common connection failures.

use thiserror::Error;

/// Errors that can occur during Docker daemon operations
#[derive(Error, Debug)]
pub enum DockerError {
    /// Failed to connect to the Docker daemon
    #[error("Docker connection failed: {0}")]
    Connection(String),

    /// TLS client setup failed (bad or mismatched certificate material)
    #[error("Docker TLS setup failed: {0}")]
    Tls(String),

    /// Docker daemon is not running or unreachable
    #[error("Docker daemon not reachable. Start the host or check DOCKER_HOST.")]
    NotRunning,

    /// Permission denied accessing Docker socket
    #[error(
        "Permission denied accessing Docker socket. You may need to add your user to the 'docker' group."
    )]
    PermissionDenied,

    /// Container list or inspect failed
    #[error("Container query failed: {0}")]
    Query(String),

    /// Operation timed out
    #[error("Docker operation timed out")]
    Timeout,
}

impl From<bollard::errors::Error> for DockerError {
    fn from(err: bollard::errors::Error) -> Self {
        if let bollard::errors::Error::RequestTimeoutError = err {
            return DockerError::Timeout;
        }

        let msg = err.to_string();

        // Detect common error patterns and provide better messages
        if msg.contains("Cannot connect to the Docker daemon")
            || msg.contains("connection refused")
            || msg.contains("Connection refused")
            || msg.contains("No such file or directory")
        {
            DockerError::NotRunning
        } else if msg.contains("permission denied") || msg.contains("Permission denied") {
            DockerError::PermissionDenied
        } else {
            DockerError::Connection(msg)
        }
    }
}
