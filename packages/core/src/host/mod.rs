//! Host management module
//!
//! Provides one contract over two kinds of Docker host:
//! - Native hosts, configured through explicit settings or the Docker environment
//! - Managed hosts, fronted by a machine-provisioning layer with a lifecycle
//! - Certificate location and loading for both
//! - Container enumeration over the currently resolved connection
//! - Named host registry (hosts.json)

pub mod certs;
mod connection;
pub mod containers;
mod error;
pub mod machine;
mod managed;
pub mod native;
mod schema;
mod storage;

#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;
use std::sync::Arc;

use crate::config::Config;
use crate::docker::{BollardDaemon, DaemonClient};

// Public exports
pub use certs::{CertificateMaterial, CertificatePaths, ClientCertificate, TlsIdentity};
pub use connection::{HostConnection, HostIdentity, LifecycleState};
pub use containers::{ContainerHandle, ListOptions};
pub use error::{HostError, LifecycleOperation};
pub use machine::{DockerMachine, MachineError, MachineInspection, MachineProvisioner};
pub use managed::ManagedHost;
pub use native::{NativeConfig, NativeHost, NativeSettings};
pub use schema::{HostEntry, HostKind, HostsFile};
pub use storage::{load_hosts, load_hosts_from, save_hosts, save_hosts_to};

/// Capabilities shared by every kind of host
///
/// Lifecycle operations take `&mut self`: a host has a single owner, and
/// callers sharing one across tasks must wrap it in a mutex.
pub trait Host: Send + Sync {
    fn identity(&self) -> &HostIdentity;

    /// Last observed lifecycle state
    fn state(&self) -> LifecycleState;

    /// Currently resolved connection, if any
    fn connection(&self) -> Option<Arc<HostConnection>>;

    /// Re-run connection resolution
    fn resolve(&mut self) -> Result<(), HostError>;

    fn start(&mut self) -> Result<(), HostError>;

    fn stop(&mut self) -> Result<(), HostError>;

    fn remove(&mut self, force: bool) -> Result<(), HostError>;

    /// Best-effort enumeration: a failed query yields no containers
    fn list_containers(
        &self,
        options: &ListOptions,
    ) -> impl Future<Output = Vec<ContainerHandle>> + Send;

    /// Enumeration that reports daemon failures
    fn try_list_containers(
        &self,
        options: &ListOptions,
    ) -> impl Future<Output = Result<Vec<ContainerHandle>, HostError>> + Send;

    /// Best-effort enumeration of running containers
    fn list_running_containers(
        &self,
        filter: Option<&str>,
    ) -> impl Future<Output = Vec<ContainerHandle>> + Send {
        let mut options = ListOptions::running();
        options.filter = filter.map(str::to_string);
        async move { self.list_containers(&options).await }
    }
}

/// A native or managed host behind one type
pub enum DockerHost<P = DockerMachine, D = BollardDaemon> {
    Native(NativeHost<D>),
    Managed(ManagedHost<P, D>),
}

impl DockerHost {
    /// Build a host from a registry entry with production collaborators
    pub fn from_entry(name: &str, entry: &HostEntry, config: &Config) -> Result<Self, HostError> {
        let daemon = BollardDaemon::new(config.daemon_timeout_secs);

        if let Some(settings) = entry.native_settings() {
            return Ok(DockerHost::Native(NativeHost::new(name, &settings, daemon)?));
        }

        let machine = entry.machine_name(name).unwrap_or(name);
        let provisioner = DockerMachine::with_binary(&config.machine_binary);
        Ok(DockerHost::Managed(ManagedHost::with_machine(
            name,
            machine,
            provisioner,
            daemon,
        )?))
    }

    /// Native host resolved entirely from the process environment
    pub fn from_env(name: &str, config: &Config) -> Result<Self, HostError> {
        let daemon = BollardDaemon::new(config.daemon_timeout_secs);
        let host = NativeHost::new(name, &NativeSettings::default(), daemon)?;
        Ok(DockerHost::Native(host))
    }
}

impl<P: MachineProvisioner, D: DaemonClient> DockerHost<P, D> {
    pub fn is_native(&self) -> bool {
        matches!(self, DockerHost::Native(_))
    }
}

impl<P: MachineProvisioner, D: DaemonClient> Host for DockerHost<P, D> {
    fn identity(&self) -> &HostIdentity {
        match self {
            DockerHost::Native(host) => host.identity(),
            DockerHost::Managed(host) => host.identity(),
        }
    }

    fn state(&self) -> LifecycleState {
        match self {
            DockerHost::Native(host) => host.state(),
            DockerHost::Managed(host) => host.state(),
        }
    }

    fn connection(&self) -> Option<Arc<HostConnection>> {
        match self {
            DockerHost::Native(host) => host.connection(),
            DockerHost::Managed(host) => host.connection(),
        }
    }

    fn resolve(&mut self) -> Result<(), HostError> {
        match self {
            DockerHost::Native(host) => host.resolve(),
            DockerHost::Managed(host) => host.resolve(),
        }
    }

    fn start(&mut self) -> Result<(), HostError> {
        match self {
            DockerHost::Native(host) => host.start(),
            DockerHost::Managed(host) => host.start(),
        }
    }

    fn stop(&mut self) -> Result<(), HostError> {
        match self {
            DockerHost::Native(host) => host.stop(),
            DockerHost::Managed(host) => host.stop(),
        }
    }

    fn remove(&mut self, force: bool) -> Result<(), HostError> {
        match self {
            DockerHost::Native(host) => host.remove(force),
            DockerHost::Managed(host) => host.remove(force),
        }
    }

    async fn list_containers(&self, options: &ListOptions) -> Vec<ContainerHandle> {
        match self {
            DockerHost::Native(host) => host.list_containers(options).await,
            DockerHost::Managed(host) => host.list_containers(options).await,
        }
    }

    async fn try_list_containers(
        &self,
        options: &ListOptions,
    ) -> Result<Vec<ContainerHandle>, HostError> {
        match self {
            DockerHost::Native(host) => host.try_list_containers(options).await,
            DockerHost::Managed(host) => host.try_list_containers(options).await,
        }
    }
}
