//! Host registry schema
//!
//! Data structures for the named hosts stored in hosts.json.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::native::NativeSettings;

/// How a registered host is reached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HostKind {
    /// Daemon reached through explicit settings or the Docker environment
    Native {
        /// Endpoint URI (falls back to DOCKER_HOST)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,

        /// Certificate directory (falls back to DOCKER_CERT_PATH)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cert_path: Option<PathBuf>,
    },

    /// Daemon inside a provisioned machine
    Managed {
        /// Machine name (defaults to the host name)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        machine: Option<String>,
    },
}

/// Configuration for a registered host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostEntry {
    #[serde(flatten)]
    pub kind: HostKind,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl HostEntry {
    /// Native host resolved entirely from the environment
    pub fn native() -> Self {
        Self {
            kind: HostKind::Native {
                endpoint: None,
                cert_path: None,
            },
            description: None,
        }
    }

    /// Managed host whose machine shares the host's name
    pub fn managed() -> Self {
        Self {
            kind: HostKind::Managed { machine: None },
            description: None,
        }
    }

    /// Builder pattern: set native endpoint
    ///
    /// Ignored for managed entries.
    pub fn with_endpoint(mut self, value: impl Into<String>) -> Self {
        if let HostKind::Native { endpoint, .. } = &mut self.kind {
            *endpoint = Some(value.into());
        }
        self
    }

    /// Builder pattern: set native certificate directory
    ///
    /// Ignored for managed entries.
    pub fn with_cert_path(mut self, value: impl Into<PathBuf>) -> Self {
        if let HostKind::Native { cert_path, .. } = &mut self.kind {
            *cert_path = Some(value.into());
        }
        self
    }

    /// Builder pattern: set machine name
    ///
    /// Ignored for native entries.
    pub fn with_machine(mut self, value: impl Into<String>) -> Self {
        if let HostKind::Managed { machine } = &mut self.kind {
            *machine = Some(value.into());
        }
        self
    }

    /// Builder pattern: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn is_native(&self) -> bool {
        matches!(self.kind, HostKind::Native { .. })
    }

    /// Native settings for this entry, if it is native
    pub fn native_settings(&self) -> Option<NativeSettings> {
        match &self.kind {
            HostKind::Native {
                endpoint,
                cert_path,
            } => Some(NativeSettings {
                endpoint: endpoint.clone(),
                cert_path: cert_path.clone(),
            }),
            HostKind::Managed { .. } => None,
        }
    }

    /// Machine backing this entry, if it is managed
    pub fn machine_name<'a>(&'a self, host_name: &'a str) -> Option<&'a str> {
        match &self.kind {
            HostKind::Managed { machine } => Some(machine.as_deref().unwrap_or(host_name)),
            HostKind::Native { .. } => None,
        }
    }
}

/// Root structure for hosts.json file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HostsFile {
    /// Schema version for future migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Default host name (None = native host from the environment)
    #[serde(default)]
    pub default_host: Option<String>,

    /// Map of host name to configuration
    #[serde(default)]
    pub hosts: HashMap<String, HostEntry>,
}

fn default_version() -> u32 {
    1
}

impl HostsFile {
    /// Create empty hosts file
    pub fn new() -> Self {
        Self {
            version: default_version(),
            ..Default::default()
        }
    }

    /// Add a host
    pub fn add_host(&mut self, name: impl Into<String>, entry: HostEntry) {
        self.hosts.insert(name.into(), entry);
    }

    /// Remove a host
    pub fn remove_host(&mut self, name: &str) -> Option<HostEntry> {
        // Clear default if removing the default host
        if self.default_host.as_deref() == Some(name) {
            self.default_host = None;
        }
        self.hosts.remove(name)
    }

    /// Get a host by name
    pub fn get_host(&self, name: &str) -> Option<&HostEntry> {
        self.hosts.get(name)
    }

    /// Check if host exists
    pub fn has_host(&self, name: &str) -> bool {
        self.hosts.contains_key(name)
    }

    /// Set the default host
    pub fn set_default(&mut self, name: Option<String>) {
        self.default_host = name;
    }

    /// Get sorted list of host names
    pub fn host_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hosts.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}
