//! Machine-managed Docker hosts
//!
//! A managed host fronts a Docker daemon that lives inside a provisioned
//! machine. Its connection comes from inspecting the machine, and it moves
//! through `Stopped -> Running -> Stopped -> Removed` under the caller's
//! control (`Running -> Removed` only when forced).

use std::sync::Arc;

use super::Host;
use super::connection::{HostConnection, HostIdentity, LifecycleState};
use super::containers::{self, ContainerHandle, ListOptions};
use super::error::{HostError, LifecycleOperation};
use super::machine::{MachineError, MachineProvisioner};
use crate::docker::DaemonClient;

/// Docker daemon fronted by a provisioned machine
pub struct ManagedHost<P, D> {
    identity: HostIdentity,
    machine: String,
    provisioner: P,
    daemon: D,
    state: LifecycleState,
    connection: Option<Arc<HostConnection>>,
}

impl<P: MachineProvisioner, D: DaemonClient> ManagedHost<P, D> {
    /// Managed host whose machine has the same name as the host
    pub fn new(name: impl Into<String>, provisioner: P, daemon: D) -> Result<Self, HostError> {
        let name = name.into();
        let machine = name.clone();
        Self::with_machine(name, machine, provisioner, daemon)
    }

    /// Managed host backed by the named machine
    ///
    /// Queries the machine's status and resolves its connection unless the
    /// machine has been removed.
    pub fn with_machine(
        name: impl Into<String>,
        machine: impl Into<String>,
        provisioner: P,
        daemon: D,
    ) -> Result<Self, HostError> {
        let mut host = Self {
            identity: HostIdentity::managed(name),
            machine: machine.into(),
            provisioner,
            daemon,
            state: LifecycleState::Unknown,
            connection: None,
        };
        host.resolve()?;
        Ok(host)
    }

    /// Name of the backing machine
    pub fn machine(&self) -> &str {
        &self.machine
    }

    /// Re-read the machine's state without touching the connection
    pub fn refresh(&mut self) -> LifecycleState {
        self.state = self.provisioner.status(&self.machine);
        self.state
    }

    /// Inspect the machine and load the certificates it reports when TLS is on
    fn inspect_connection(&self) -> Result<HostConnection, HostError> {
        let inspection = self
            .provisioner
            .inspect(&self.machine)
            .map_err(|e| self.failed(LifecycleOperation::Inspect, e))?;

        let paths = inspection.certificate_paths();
        HostConnection::load(inspection.uri, inspection.require_tls, paths)
    }

    fn check_transition(
        &self,
        operation: LifecycleOperation,
        allowed: bool,
    ) -> Result<(), HostError> {
        if allowed {
            Ok(())
        } else {
            Err(HostError::IllegalTransition {
                host: self.identity.name().to_string(),
                operation,
                state: self.state,
            })
        }
    }

    fn failed(&self, operation: LifecycleOperation, err: MachineError) -> HostError {
        HostError::OperationFailed {
            host: self.identity.name().to_string(),
            operation,
            message: err.to_string(),
        }
    }
}

impl<P: MachineProvisioner, D: DaemonClient> Host for ManagedHost<P, D> {
    fn identity(&self) -> &HostIdentity {
        &self.identity
    }

    fn state(&self) -> LifecycleState {
        self.state
    }

    fn connection(&self) -> Option<Arc<HostConnection>> {
        self.connection.clone()
    }

    /// Managed resolution
    ///
    /// A running machine with an already resolved connection is left as is.
    /// A removed machine has nothing to inspect and drops its connection.
    /// Any other state triggers an inspection.
    fn resolve(&mut self) -> Result<(), HostError> {
        let status = self.provisioner.status(&self.machine);
        tracing::debug!("Machine {} reports {}", self.machine, status);

        match status {
            LifecycleState::Running if self.connection.is_some() => {
                self.state = status;
            }
            LifecycleState::Removed => {
                self.state = status;
                self.connection = None;
            }
            _ => {
                let connection = self.inspect_connection()?;
                self.connection = Some(Arc::new(connection));
                self.state = status;
            }
        }

        Ok(())
    }

    fn start(&mut self) -> Result<(), HostError> {
        let operation = LifecycleOperation::Start;
        self.check_transition(operation, self.state == LifecycleState::Stopped)?;

        tracing::info!("Starting machine {}", self.machine);
        self.provisioner
            .start(&self.machine)
            .map_err(|e| self.failed(operation, e))?;
        self.refresh();

        // The daemon address can change across restarts
        match self.inspect_connection() {
            Ok(connection) => {
                self.connection = Some(Arc::new(connection));
                Ok(())
            }
            Err(e) => {
                self.connection = None;
                Err(e)
            }
        }
    }

    fn stop(&mut self) -> Result<(), HostError> {
        let operation = LifecycleOperation::Stop;
        self.check_transition(operation, self.state == LifecycleState::Running)?;

        tracing::info!("Stopping machine {}", self.machine);
        self.provisioner
            .stop(&self.machine)
            .map_err(|e| self.failed(operation, e))?;
        self.refresh();
        Ok(())
    }

    fn remove(&mut self, force: bool) -> Result<(), HostError> {
        let operation = LifecycleOperation::Remove;
        let allowed = match self.state {
            LifecycleState::Removed => false,
            LifecycleState::Running => force,
            LifecycleState::Stopped | LifecycleState::Unknown => true,
        };
        self.check_transition(operation, allowed)?;

        tracing::info!("Removing machine {} (force={})", self.machine, force);
        self.provisioner
            .delete(&self.machine, force)
            .map_err(|e| self.failed(operation, e))?;
        self.refresh();
        self.connection = None;
        Ok(())
    }

    async fn list_containers(&self, options: &ListOptions) -> Vec<ContainerHandle> {
        containers::list_containers(&self.daemon, self.connection.as_ref(), options).await
    }

    async fn try_list_containers(
        &self,
        options: &ListOptions,
    ) -> Result<Vec<ContainerHandle>, HostError> {
        containers::try_list_containers(
            &self.daemon,
            self.identity.name(),
            self.connection.as_ref(),
            options,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::{CertFixture, FakeDaemon, FakeProvisioner};

    fn managed(
        provisioner: &Arc<FakeProvisioner>,
    ) -> ManagedHost<Arc<FakeProvisioner>, FakeDaemon> {
        ManagedHost::new("dev", Arc::clone(provisioner), FakeDaemon::new()).unwrap()
    }

    #[test]
    fn construction_inspects_stopped_machine() {
        let fixture = CertFixture::new();
        let provisioner = Arc::new(FakeProvisioner::new(
            LifecycleState::Stopped,
            fixture.inspection("tcp://192.168.99.100:2376", true),
        ));

        let host = managed(&provisioner);
        assert_eq!(host.state(), LifecycleState::Stopped);
        assert!(!host.identity().is_native());
        assert_eq!(host.machine(), "dev");
        let connection = host.connection().unwrap();
        assert_eq!(connection.endpoint(), "tcp://192.168.99.100:2376");
        assert!(connection.require_tls());
    }

    #[test]
    fn construction_of_removed_machine_has_no_connection() {
        let fixture = CertFixture::new();
        let provisioner = Arc::new(FakeProvisioner::new(
            LifecycleState::Removed,
            fixture.inspection("tcp://192.168.99.100:2376", true),
        ));

        let host = managed(&provisioner);
        assert_eq!(host.state(), LifecycleState::Removed);
        assert!(host.connection().is_none());
        assert!(!provisioner.calls().iter().any(|c| c.starts_with("inspect")));
    }

    #[test]
    fn resolve_short_circuits_when_running() {
        let fixture = CertFixture::new();
        let provisioner = Arc::new(FakeProvisioner::new(
            LifecycleState::Running,
            fixture.inspection("tcp://192.168.99.100:2376", true),
        ));
        let mut host = managed(&provisioner);
        let before = host.connection().unwrap();

        provisioner.set_inspection(fixture.inspection("tcp://192.168.99.101:2376", false));
        host.resolve().unwrap();

        let after = host.connection().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.endpoint(), "tcp://192.168.99.100:2376");
    }

    #[test]
    fn start_from_stopped_adopts_new_inspection() {
        let first = CertFixture::new();
        let second = CertFixture::new();
        let provisioner = Arc::new(FakeProvisioner::new(
            LifecycleState::Stopped,
            first.inspection("tcp://192.168.99.100:2376", true),
        ));
        let mut host = managed(&provisioner);

        provisioner.set_inspection(second.inspection("tcp://192.168.99.102:2376", false));
        host.start().unwrap();

        assert_eq!(host.state(), LifecycleState::Running);
        let connection = host.connection().unwrap();
        assert!(!connection.require_tls());
        assert_eq!(connection.endpoint(), "tcp://192.168.99.102:2376");
        assert_eq!(connection.ca_certificate_path(), second.path().join("ca.pem"));
        assert_eq!(
            connection.client_certificate_path(),
            second.path().join("cert.pem")
        );
        assert_eq!(connection.client_key_path(), second.path().join("key.pem"));
    }

    #[test]
    fn start_requires_stopped() {
        let fixture = CertFixture::new();
        for state in [LifecycleState::Running, LifecycleState::Removed] {
            let provisioner = Arc::new(FakeProvisioner::new(
                state,
                fixture.inspection("tcp://192.168.99.100:2376", true),
            ));
            let mut host = managed(&provisioner);

            let err = host.start().unwrap_err();
            match err {
                HostError::IllegalTransition {
                    operation, state: s, ..
                } => {
                    assert_eq!(operation, LifecycleOperation::Start);
                    assert_eq!(s, state);
                }
                other => panic!("Expected IllegalTransition, got: {:?}", other),
            }
            assert_eq!(host.state(), state);
            assert!(!provisioner.calls().iter().any(|c| c.starts_with("start")));
        }
    }

    #[test]
    fn failed_start_leaves_state_unchanged() {
        let fixture = CertFixture::new();
        let provisioner = Arc::new(FakeProvisioner::new(
            LifecycleState::Stopped,
            fixture.inspection("tcp://192.168.99.100:2376", true),
        ));
        let mut host = managed(&provisioner);
        let before = host.connection().unwrap();

        provisioner.fail_operations("machine is locked");
        let err = host.start().unwrap_err();

        match err {
            HostError::OperationFailed { host: name, message, .. } => {
                assert_eq!(name, "dev");
                assert!(message.contains("machine is locked"));
            }
            other => panic!("Expected OperationFailed, got: {:?}", other),
        }
        assert_eq!(host.state(), LifecycleState::Stopped);
        assert!(Arc::ptr_eq(&before, &host.connection().unwrap()));
    }

    #[test]
    fn stop_requires_running() {
        let fixture = CertFixture::new();
        let provisioner = Arc::new(FakeProvisioner::new(
            LifecycleState::Stopped,
            fixture.inspection("tcp://192.168.99.100:2376", true),
        ));
        let mut host = managed(&provisioner);

        assert!(matches!(
            host.stop(),
            Err(HostError::IllegalTransition { .. })
        ));

        host.start().unwrap();
        host.stop().unwrap();
        assert_eq!(host.state(), LifecycleState::Stopped);
        // Stopping keeps the last resolved connection
        assert!(host.connection().is_some());
    }

    #[test]
    fn failed_stop_leaves_host_running() {
        let fixture = CertFixture::new();
        let provisioner = Arc::new(FakeProvisioner::new(
            LifecycleState::Running,
            fixture.inspection("tcp://192.168.99.100:2376", true),
        ));
        let mut host = managed(&provisioner);
        let before = host.connection().unwrap();

        provisioner.fail_operations("machine is busy");
        let err = host.stop().unwrap_err();

        match err {
            HostError::OperationFailed {
                operation, message, ..
            } => {
                assert_eq!(operation, LifecycleOperation::Stop);
                assert!(message.contains("machine is busy"));
            }
            other => panic!("Expected OperationFailed, got: {:?}", other),
        }
        assert_eq!(host.state(), LifecycleState::Running);
        assert!(Arc::ptr_eq(&before, &host.connection().unwrap()));
    }

    #[test]
    fn remove_running_requires_force() {
        let fixture = CertFixture::new();
        let provisioner = Arc::new(FakeProvisioner::new(
            LifecycleState::Running,
            fixture.inspection("tcp://192.168.99.100:2376", true),
        ));
        let mut host = managed(&provisioner);

        let err = host.remove(false).unwrap_err();
        assert!(matches!(err, HostError::IllegalTransition { .. }));
        assert_eq!(host.state(), LifecycleState::Running);

        host.remove(true).unwrap();
        assert_eq!(host.state(), LifecycleState::Removed);
        assert!(host.connection().is_none());
        assert!(provisioner.calls().contains(&"delete dev force=true".to_string()));
    }

    #[test]
    fn remove_stopped_without_force() {
        let fixture = CertFixture::new();
        let provisioner = Arc::new(FakeProvisioner::new(
            LifecycleState::Stopped,
            fixture.inspection("tcp://192.168.99.100:2376", true),
        ));
        let mut host = managed(&provisioner);

        host.remove(false).unwrap();
        assert_eq!(host.state(), LifecycleState::Removed);

        // Nothing left to remove or start
        assert!(matches!(
            host.remove(true),
            Err(HostError::IllegalTransition { .. })
        ));
        assert!(matches!(
            host.start(),
            Err(HostError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn failed_remove_surfaces_operation_failed() {
        let fixture = CertFixture::new();
        let provisioner = Arc::new(FakeProvisioner::new(
            LifecycleState::Stopped,
            fixture.inspection("tcp://192.168.99.100:2376", true),
        ));
        let mut host = managed(&provisioner);

        provisioner.fail_operations("driver error");
        let err = host.remove(false).unwrap_err();
        assert!(matches!(err, HostError::OperationFailed { .. }));
        assert_eq!(host.state(), LifecycleState::Stopped);
        assert!(host.connection().is_some());
    }

    #[test]
    fn inspection_failure_is_reported() {
        let provisioner = Arc::new(FakeProvisioner::without_inspection(LifecycleState::Stopped));
        let err = ManagedHost::new("dev", Arc::clone(&provisioner), FakeDaemon::new())
            .err()
            .unwrap();
        match err {
            HostError::OperationFailed { operation, .. } => {
                assert_eq!(operation, LifecycleOperation::Inspect)
            }
            other => panic!("Expected OperationFailed, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn removed_host_lists_nothing() {
        let fixture = CertFixture::new();
        let provisioner = Arc::new(FakeProvisioner::new(
            LifecycleState::Stopped,
            fixture.inspection("tcp://192.168.99.100:2376", true),
        ));
        let daemon = Arc::new(FakeDaemon::new().with_container("c1", "web", true));
        let mut host =
            ManagedHost::new("dev", Arc::clone(&provisioner), Arc::clone(&daemon)).unwrap();

        assert_eq!(host.list_containers(&ListOptions::all()).await.len(), 1);

        host.remove(false).unwrap();
        assert!(host.list_containers(&ListOptions::all()).await.is_empty());
        assert!(matches!(
            host.try_list_containers(&ListOptions::all()).await,
            Err(HostError::NotConnected(_))
        ));
    }
}
