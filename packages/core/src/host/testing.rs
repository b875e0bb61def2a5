//! Test fixtures: generated certificates and in-memory collaborators

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::x509::{X509, X509NameBuilder};
use tempfile::TempDir;

use super::certs::{CA_FILE_NAME, CLIENT_CERT_FILE_NAME, CLIENT_KEY_FILE_NAME, CertificatePaths};
use super::connection::{HostConnection, LifecycleState};
use super::machine::{MachineError, MachineInspection, MachineProvisioner};
use crate::docker::{ContainerQuery, DaemonClient, DockerError};

fn generate_key() -> PKey<Private> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
    PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
}

fn build_certificate(
    common_name: &str,
    serial: u32,
    key: &PKey<Private>,
    issuer: Option<(&X509, &PKey<Private>)>,
) -> X509 {
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("CN", common_name).unwrap();
    let name = name.build();

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    let serial = BigNum::from_u32(serial).unwrap().to_asn1_integer().unwrap();
    builder.set_serial_number(&serial).unwrap();
    builder.set_subject_name(&name).unwrap();
    match issuer {
        Some((ca, _)) => builder.set_issuer_name(ca.subject_name()).unwrap(),
        None => builder.set_issuer_name(&name).unwrap(),
    }
    builder.set_pubkey(key).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(30).unwrap())
        .unwrap();

    let signer = issuer.map(|(_, ca_key)| ca_key).unwrap_or(key);
    builder.sign(signer, MessageDigest::sha256()).unwrap();
    builder.build()
}

/// Temporary directory holding `ca.pem`, `cert.pem` and `key.pem`
pub(crate) struct CertFixture {
    dir: TempDir,
    ca_pem: String,
}

impl CertFixture {
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();

        let ca_key = generate_key();
        let ca = build_certificate("docker-host test CA", 1, &ca_key, None);
        let client_key = generate_key();
        let client = build_certificate("docker-host client", 2, &client_key, Some((&ca, &ca_key)));

        let ca_pem = String::from_utf8(ca.to_pem().unwrap()).unwrap();
        std::fs::write(dir.path().join(CA_FILE_NAME), &ca_pem).unwrap();
        std::fs::write(
            dir.path().join(CLIENT_CERT_FILE_NAME),
            client.to_pem().unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(CLIENT_KEY_FILE_NAME),
            client_key.private_key_to_pem_pkcs8().unwrap(),
        )
        .unwrap();

        Self { dir, ca_pem }
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn ca_pem(&self) -> &str {
        &self.ca_pem
    }

    /// Inspection result pointing at this fixture's files
    pub(crate) fn inspection(&self, uri: &str, require_tls: bool) -> MachineInspection {
        let paths = CertificatePaths::in_directory(self.path());
        MachineInspection {
            uri: uri.to_string(),
            require_tls,
            ca_cert_path: paths.ca,
            client_cert_path: paths.cert,
            client_key_path: paths.key,
        }
    }
}

/// Overwrite `key.pem` with a key unrelated to `cert.pem`
pub(crate) fn write_mismatched_key(dir: &Path) {
    let other = generate_key();
    std::fs::write(
        dir.join(CLIENT_KEY_FILE_NAME),
        other.private_key_to_pem_pkcs8().unwrap(),
    )
    .unwrap();
}

/// A connection backed by freshly generated certificates
///
/// The fixture must outlive any use of the certificate paths.
pub(crate) fn connection_for(endpoint: &str, require_tls: bool) -> (CertFixture, HostConnection) {
    let fixture = CertFixture::new();
    let paths = CertificatePaths::in_directory(fixture.path());
    let connection = HostConnection::load(endpoint, require_tls, paths).unwrap();
    (fixture, connection)
}

/// Environment lookup over a fixed set of variables
pub(crate) fn env_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

struct FakeMachine {
    state: LifecycleState,
    inspection: Option<MachineInspection>,
    failure: Option<String>,
    calls: Vec<String>,
}

/// In-memory provisioner recording every call
pub(crate) struct FakeProvisioner {
    machine: Mutex<FakeMachine>,
}

impl FakeProvisioner {
    pub(crate) fn new(state: LifecycleState, inspection: MachineInspection) -> Self {
        Self {
            machine: Mutex::new(FakeMachine {
                state,
                inspection: Some(inspection),
                failure: None,
                calls: Vec::new(),
            }),
        }
    }

    pub(crate) fn without_inspection(state: LifecycleState) -> Self {
        Self {
            machine: Mutex::new(FakeMachine {
                state,
                inspection: None,
                failure: None,
                calls: Vec::new(),
            }),
        }
    }

    pub(crate) fn set_inspection(&self, inspection: MachineInspection) {
        self.machine.lock().unwrap().inspection = Some(inspection);
    }

    /// Make start/stop/delete fail with `message`
    pub(crate) fn fail_operations(&self, message: &str) {
        self.machine.lock().unwrap().failure = Some(message.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.machine.lock().unwrap().calls.clone()
    }

    fn transition(
        &self,
        call: String,
        target: LifecycleState,
    ) -> Result<(), MachineError> {
        let mut machine = self.machine.lock().unwrap();
        machine.calls.push(call.clone());
        if let Some(stderr) = machine.failure.clone() {
            return Err(MachineError::CommandFailed {
                command: call,
                stderr,
            });
        }
        machine.state = target;
        Ok(())
    }
}

impl MachineProvisioner for FakeProvisioner {
    fn start(&self, machine: &str) -> Result<(), MachineError> {
        self.transition(format!("start {machine}"), LifecycleState::Running)
    }

    fn stop(&self, machine: &str) -> Result<(), MachineError> {
        self.transition(format!("stop {machine}"), LifecycleState::Stopped)
    }

    fn delete(&self, machine: &str, force: bool) -> Result<(), MachineError> {
        self.transition(
            format!("delete {machine} force={force}"),
            LifecycleState::Removed,
        )
    }

    fn status(&self, machine: &str) -> LifecycleState {
        let mut state = self.machine.lock().unwrap();
        state.calls.push(format!("status {machine}"));
        state.state
    }

    fn inspect(&self, machine: &str) -> Result<MachineInspection, MachineError> {
        let mut state = self.machine.lock().unwrap();
        state.calls.push(format!("inspect {machine}"));
        state
            .inspection
            .clone()
            .ok_or_else(|| MachineError::InvalidOutput(format!("no such machine: {machine}")))
    }
}

struct FakeContainer {
    id: String,
    name: String,
    running: bool,
}

/// In-memory daemon recording sessions, list queries and inspect concurrency
#[derive(Default)]
pub(crate) struct FakeDaemon {
    containers: Vec<FakeContainer>,
    fail_open: bool,
    fail_list: bool,
    sessions: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    queries: Mutex<Vec<ContainerQuery>>,
}

impl FakeDaemon {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_container(mut self, id: &str, name: &str, running: bool) -> Self {
        self.containers.push(FakeContainer {
            id: id.to_string(),
            name: name.to_string(),
            running,
        });
        self
    }

    pub(crate) fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub(crate) fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub(crate) fn queries(&self) -> Vec<ContainerQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// Number of sessions opened so far
    pub(crate) fn sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }

    /// Most inspects observed running at once
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl DaemonClient for FakeDaemon {
    type Session = String;

    fn open(&self, connection: &HostConnection) -> Result<String, DockerError> {
        if self.fail_open {
            return Err(DockerError::Tls("handshake failed".to_string()));
        }
        self.sessions.fetch_add(1, Ordering::SeqCst);
        Ok(connection.endpoint().to_string())
    }

    async fn list_container_ids(
        &self,
        _session: &String,
        query: &ContainerQuery,
    ) -> Result<Vec<String>, DockerError> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail_list {
            return Err(DockerError::NotRunning);
        }

        Ok(self
            .containers
            .iter()
            .filter(|c| query.all || c.running)
            .map(|c| c.id.clone())
            .collect())
    }

    async fn inspect_container_name(
        &self,
        _session: &String,
        id: &str,
    ) -> Result<String, DockerError> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.containers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .ok_or_else(|| DockerError::Query(format!("No such container: {id}")))
    }
}
