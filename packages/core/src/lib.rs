//! docker-host-core - Core library for docker-host
//!
//! Resolves connections to Docker daemons, either configured directly
//! (native hosts) or running inside machines driven by a provisioning tool
//! (managed hosts), and enumerates containers over those connections.

pub mod config;
pub mod docker;
pub mod host;
pub mod version;

pub use config::{Config, load_config, save_config};
pub use docker::{BollardDaemon, DaemonClient, DockerClient, DockerError};
pub use host::{
    ContainerHandle, DockerHost, Host, HostConnection, HostEntry, HostError, HostIdentity,
    HostKind, HostsFile, LifecycleOperation, LifecycleState, ListOptions, ManagedHost, NativeHost,
    load_hosts, save_hosts,
};
pub use version::{get_version, get_version_long};
