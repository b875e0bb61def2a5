//! Container queries against a host's daemon
//!
//! [`DaemonClient`] is the seam between container enumeration and the wire.
//! [`BollardDaemon`] is the production implementation.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use bollard::container::ListContainersOptions;

use super::client::{DEFAULT_TIMEOUT_SECS, DockerClient};
use super::error::DockerError;
use crate::host::HostConnection;

/// Parameters of a container list query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerQuery {
    /// Include containers that are not running
    pub all: bool,
    /// Filter expression, forwarded as given
    pub filter: Option<String>,
}

/// Container list/inspect calls against a Docker daemon
///
/// An enumeration opens one session against the host's connection and runs
/// every query of that enumeration through it.
pub trait DaemonClient: Send + Sync {
    /// Open connection to one daemon
    type Session: Send + Sync;

    /// Connect to the daemon described by `connection`
    fn open(&self, connection: &HostConnection) -> Result<Self::Session, DockerError>;

    /// List the ids of containers matching `query`
    fn list_container_ids(
        &self,
        session: &Self::Session,
        query: &ContainerQuery,
    ) -> impl Future<Output = Result<Vec<String>, DockerError>> + Send;

    /// Look up a container's name
    fn inspect_container_name(
        &self,
        session: &Self::Session,
        id: &str,
    ) -> impl Future<Output = Result<String, DockerError>> + Send;
}

impl<T: DaemonClient> DaemonClient for Arc<T> {
    type Session = T::Session;

    fn open(&self, connection: &HostConnection) -> Result<Self::Session, DockerError> {
        (**self).open(connection)
    }

    fn list_container_ids(
        &self,
        session: &Self::Session,
        query: &ContainerQuery,
    ) -> impl Future<Output = Result<Vec<String>, DockerError>> + Send {
        (**self).list_container_ids(session, query)
    }

    fn inspect_container_name(
        &self,
        session: &Self::Session,
        id: &str,
    ) -> impl Future<Output = Result<String, DockerError>> + Send {
        (**self).inspect_container_name(session, id)
    }
}

/// Daemon client backed by bollard
///
/// Each session is a fresh bollard client, so every enumeration uses the
/// connection the host holds at that moment.
#[derive(Debug, Clone)]
pub struct BollardDaemon {
    timeout_secs: u64,
}

impl Default for BollardDaemon {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS)
    }
}

impl BollardDaemon {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }
}

impl DaemonClient for BollardDaemon {
    type Session = DockerClient;

    fn open(&self, connection: &HostConnection) -> Result<DockerClient, DockerError> {
        DockerClient::connect(connection, self.timeout_secs)
    }

    async fn list_container_ids(
        &self,
        client: &DockerClient,
        query: &ContainerQuery,
    ) -> Result<Vec<String>, DockerError> {
        let options = ListContainersOptions::<String> {
            all: query.all,
            filters: filter_map(query.filter.as_deref()),
            ..Default::default()
        };

        let containers = client
            .inner()
            .list_containers(Some(options))
            .await
            .map_err(DockerError::from)?;

        Ok(containers.into_iter().filter_map(|c| c.id).collect())
    }

    async fn inspect_container_name(
        &self,
        client: &DockerClient,
        id: &str,
    ) -> Result<String, DockerError> {
        let info = client
            .inner()
            .inspect_container(id, None)
            .await
            .map_err(|e| DockerError::Query(format!("Failed to inspect container {id}: {e}")))?;

        // The API reports names with a leading slash
        Ok(info
            .name
            .map(|name| name.trim_start_matches('/').to_string())
            .unwrap_or_default())
    }
}

/// Split a filter expression into the daemon's filter map
///
/// Whitespace separates terms; each term is `key=value` and terms are
/// combined conjunctively by the daemon. Keys are not validated here, a
/// term without `=` is sent as a key with an empty value.
fn filter_map(filter: Option<&str>) -> HashMap<String, Vec<String>> {
    let mut filters: HashMap<String, Vec<String>> = HashMap::new();

    for term in filter.unwrap_or_default().split_whitespace() {
        let (key, value) = term.split_once('=').unwrap_or((term, ""));
        filters
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }

    filters
}
