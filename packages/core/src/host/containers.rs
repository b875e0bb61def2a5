//! Container enumeration
//!
//! Lists containers through a host's current connection and turns each id
//! into a [`ContainerHandle`]. Nothing is cached between calls.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};

use super::connection::HostConnection;
use super::error::HostError;
use crate::docker::{ContainerQuery, DaemonClient, DockerError};

/// A container discovered on a host
///
/// Carries the connection it was found under so it can be addressed later
/// on its own. It describes the moment of enumeration only.
#[derive(Debug, Clone)]
pub struct ContainerHandle {
    id: String,
    name: String,
    connection: Arc<HostConnection>,
}

impl ContainerHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connection(&self) -> &Arc<HostConnection> {
        &self.connection
    }
}

/// Options for listing containers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Include containers that are not running (default: true)
    pub include_stopped: bool,
    /// Filter expression passed to the daemon as given
    pub filter: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self::all()
    }
}

impl ListOptions {
    /// Every container regardless of state
    pub fn all() -> Self {
        Self {
            include_stopped: true,
            filter: None,
        }
    }

    /// Running containers only
    pub fn running() -> Self {
        Self {
            include_stopped: false,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    fn query(&self) -> ContainerQuery {
        ContainerQuery {
            all: self.include_stopped,
            filter: self.filter.clone().filter(|f| !f.is_empty()),
        }
    }
}

/// Upper bound on container inspects in flight during one enumeration
pub const MAX_CONCURRENT_INSPECTS: usize = 8;

/// List containers, treating any query failure as "no containers"
///
/// A host without a connection also yields an empty list. Containers whose
/// follow-up inspect fails are skipped.
pub async fn list_containers<D: DaemonClient>(
    daemon: &D,
    connection: Option<&Arc<HostConnection>>,
    options: &ListOptions,
) -> Vec<ContainerHandle> {
    let Some(connection) = connection else {
        tracing::debug!("No resolved connection, no containers to list");
        return Vec::new();
    };

    let session = match daemon.open(connection) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(
                "Cannot connect to {}, reporting no containers: {}",
                connection.endpoint(),
                e
            );
            return Vec::new();
        }
    };

    let query = options.query();
    let ids = match daemon.list_container_ids(&session, &query).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(
                "Container list on {} failed, reporting none: {}",
                connection.endpoint(),
                e
            );
            return Vec::new();
        }
    };

    let session = &session;
    let handles: Vec<Option<ContainerHandle>> = stream::iter(ids)
        .map(|id| async move {
            match daemon.inspect_container_name(session, &id).await {
                Ok(name) => Some(handle(id, name, connection)),
                Err(e) => {
                    tracing::warn!("Skipping container {}: {}", id, e);
                    None
                }
            }
        })
        .buffered(MAX_CONCURRENT_INSPECTS)
        .collect()
        .await;

    handles.into_iter().flatten().collect()
}

/// List containers, propagating daemon failures
pub async fn try_list_containers<D: DaemonClient>(
    daemon: &D,
    host: &str,
    connection: Option<&Arc<HostConnection>>,
    options: &ListOptions,
) -> Result<Vec<ContainerHandle>, HostError> {
    let connection = connection.ok_or_else(|| HostError::NotConnected(host.to_string()))?;
    let daemon_error = |source: DockerError| HostError::Daemon {
        host: host.to_string(),
        source,
    };

    let session = daemon.open(connection).map_err(daemon_error)?;
    let query = options.query();
    let ids = daemon
        .list_container_ids(&session, &query)
        .await
        .map_err(daemon_error)?;

    let session = &session;
    stream::iter(ids)
        .map(|id| async move {
            let name = daemon.inspect_container_name(session, &id).await?;
            Ok::<_, DockerError>(handle(id, name, connection))
        })
        .buffered(MAX_CONCURRENT_INSPECTS)
        .try_collect::<Vec<_>>()
        .await
        .map_err(daemon_error)
}

fn handle(id: String, name: String, connection: &Arc<HostConnection>) -> ContainerHandle {
    ContainerHandle {
        id,
        name,
        connection: Arc::clone(connection),
    }
}
