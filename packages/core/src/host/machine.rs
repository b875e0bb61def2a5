//! Machine provisioning layer
//!
//! Managed hosts are driven through [`MachineProvisioner`]. The production
//! implementation shells out to `docker-machine`.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::certs::CertificatePaths;
use super::connection::LifecycleState;

/// Port the provisioned Docker engine listens on
pub const MACHINE_DOCKER_PORT: u16 = 2376;

/// Errors reported by the provisioning layer
#[derive(Error, Debug)]
pub enum MachineError {
    /// The provisioning binary could not be run
    #[error("Failed to run {binary}: {message}")]
    Spawn { binary: String, message: String },

    /// The command ran and reported failure
    #[error("'{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// The command succeeded but its output could not be understood
    #[error("Unexpected provisioner output: {0}")]
    InvalidOutput(String),
}

/// Connection details reported by inspecting a machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineInspection {
    pub uri: String,
    pub require_tls: bool,
    pub ca_cert_path: PathBuf,
    pub client_cert_path: PathBuf,
    pub client_key_path: PathBuf,
}

impl MachineInspection {
    pub fn certificate_paths(&self) -> CertificatePaths {
        CertificatePaths {
            ca: self.ca_cert_path.clone(),
            cert: self.client_cert_path.clone(),
            key: self.client_key_path.clone(),
        }
    }
}

/// Operations of a machine-provisioning layer
///
/// Every call blocks until the underlying operation completes.
pub trait MachineProvisioner: Send + Sync {
    fn start(&self, machine: &str) -> Result<(), MachineError>;

    fn stop(&self, machine: &str) -> Result<(), MachineError>;

    fn delete(&self, machine: &str, force: bool) -> Result<(), MachineError>;

    /// Current state; failures to query map to `Removed` or `Unknown`
    fn status(&self, machine: &str) -> LifecycleState;

    fn inspect(&self, machine: &str) -> Result<MachineInspection, MachineError>;
}

impl<T: MachineProvisioner> MachineProvisioner for Arc<T> {
    fn start(&self, machine: &str) -> Result<(), MachineError> {
        (**self).start(machine)
    }

    fn stop(&self, machine: &str) -> Result<(), MachineError> {
        (**self).stop(machine)
    }

    fn delete(&self, machine: &str, force: bool) -> Result<(), MachineError> {
        (**self).delete(machine, force)
    }

    fn status(&self, machine: &str) -> LifecycleState {
        (**self).status(machine)
    }

    fn inspect(&self, machine: &str) -> Result<MachineInspection, MachineError> {
        (**self).inspect(machine)
    }
}

/// Provisioner backed by the `docker-machine` CLI
#[derive(Debug, Clone)]
pub struct DockerMachine {
    binary: PathBuf,
}

impl Default for DockerMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerMachine {
    pub const DEFAULT_BINARY: &'static str = "docker-machine";

    pub fn new() -> Self {
        Self::with_binary(Self::DEFAULT_BINARY)
    }

    /// Use a specific docker-machine executable
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run a docker-machine subcommand and return its stdout
    fn run(&self, args: &[&str]) -> Result<String, MachineError> {
        let binary = self.binary.display().to_string();
        let command = format!("{} {}", binary, args.join(" "));
        tracing::debug!("Running: {}", command);

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| MachineError::Spawn {
                binary: binary.clone(),
                message: if e.kind() == std::io::ErrorKind::NotFound {
                    "executable not found. Install docker-machine or set machine_binary."
                        .to_string()
                } else {
                    e.to_string()
                },
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(MachineError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl MachineProvisioner for DockerMachine {
    fn start(&self, machine: &str) -> Result<(), MachineError> {
        self.run(&["start", machine]).map(drop)
    }

    fn stop(&self, machine: &str) -> Result<(), MachineError> {
        self.run(&["stop", machine]).map(drop)
    }

    fn delete(&self, machine: &str, force: bool) -> Result<(), MachineError> {
        if force {
            self.run(&["rm", "-y", "-f", machine]).map(drop)
        } else {
            self.run(&["rm", "-y", machine]).map(drop)
        }
    }

    fn status(&self, machine: &str) -> LifecycleState {
        match self.run(&["status", machine]) {
            Ok(output) => parse_status(&output),
            Err(MachineError::CommandFailed { stderr, .. }) if stderr.contains("does not exist") => {
                LifecycleState::Removed
            }
            Err(e) => {
                tracing::warn!("Could not query status of machine {}: {}", machine, e);
                LifecycleState::Unknown
            }
        }
    }

    fn inspect(&self, machine: &str) -> Result<MachineInspection, MachineError> {
        let output = self.run(&["inspect", machine])?;
        parse_inspect(&output)
    }
}

/// Map `docker-machine status` output onto a lifecycle state
fn parse_status(output: &str) -> LifecycleState {
    match output.trim() {
        "Running" => LifecycleState::Running,
        "Stopped" | "Saved" | "Paused" => LifecycleState::Stopped,
        "Does not exist" | "NotFound" => LifecycleState::Removed,
        _ => LifecycleState::Unknown,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectDocument {
    driver: InspectDriver,
    host_options: InspectHostOptions,
}

#[derive(Deserialize)]
struct InspectDriver {
    #[serde(rename = "IPAddress", default)]
    ip_address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectHostOptions {
    engine_options: InspectEngineOptions,
    auth_options: InspectAuthOptions,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectEngineOptions {
    #[serde(default)]
    tls_verify: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectAuthOptions {
    ca_cert_path: PathBuf,
    client_cert_path: PathBuf,
    client_key_path: PathBuf,
}

/// Parse `docker-machine inspect` JSON
fn parse_inspect(json: &str) -> Result<MachineInspection, MachineError> {
    let doc: InspectDocument = serde_json::from_str(json)
        .map_err(|e| MachineError::InvalidOutput(format!("invalid inspect JSON: {e}")))?;

    if doc.driver.ip_address.is_empty() {
        return Err(MachineError::InvalidOutput(
            "machine reports no IP address".to_string(),
        ));
    }

    let auth = doc.host_options.auth_options;
    Ok(MachineInspection {
        uri: format!("tcp://{}:{}", doc.driver.ip_address, MACHINE_DOCKER_PORT),
        require_tls: doc.host_options.engine_options.tls_verify,
        ca_cert_path: auth.ca_cert_path,
        client_cert_path: auth.client_cert_path,
        client_key_path: auth.client_key_path,
    })
}
