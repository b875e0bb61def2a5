//! Configuration schema for docker-host
//!
//! Defines the structure and defaults for the config.json file.

use serde::{Deserialize, Serialize};

use crate::docker::DEFAULT_TIMEOUT_SECS;
use crate::host::DockerMachine;

/// Main configuration structure for docker-host
///
/// Serialized to/from `~/.config/docker-host/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version for migrations
    pub version: u32,

    /// Provisioning binary used for managed hosts (default: "docker-machine")
    #[serde(default = "default_machine_binary")]
    pub machine_binary: String,

    /// Daemon request timeout in seconds (default: 120)
    #[serde(default = "default_daemon_timeout_secs")]
    pub daemon_timeout_secs: u64,
}

fn default_machine_binary() -> String {
    DockerMachine::DEFAULT_BINARY.to_string()
}

fn default_daemon_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            machine_binary: default_machine_binary(),
            daemon_timeout_secs: default_daemon_timeout_secs(),
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }
}
