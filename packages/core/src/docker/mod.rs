//! Docker daemon access
//!
//! This module provides the daemon side of container enumeration:
//! - Docker client wrapper connecting to a resolved host (TLS or plain)
//! - Docker-specific error types
//! - The `DaemonClient` seam and its bollard implementation

mod client;
mod daemon;
mod error;

pub use client::{DEFAULT_TIMEOUT_SECS, DockerClient};
pub use daemon::{BollardDaemon, ContainerQuery, DaemonClient};
pub use error::DockerError;
