//! Status command implementation
//!
//! Shows a host's identity, lifecycle state and resolved connection.

use anyhow::Result;
use clap::Args;
use console::style;
use docker_host_core::{Config, DockerClient, DockerHost, Host, HostConnection};

use crate::output::{flag_style, state_style};

/// Arguments for the status command
#[derive(Args)]
pub struct StatusArgs {
    /// Host name (default: registry default, then the environment)
    pub host: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also query the daemon for its version
    #[arg(long)]
    pub check: bool,
}

pub async fn cmd_status(args: &StatusArgs, config: &Config, quiet: bool) -> Result<()> {
    let host = crate::resolve_host(args.host.as_deref(), config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status_json(&host))?);
        return Ok(());
    }

    if quiet {
        println!("{}", host.state());
        return Ok(());
    }

    let identity = host.identity();
    let kind = if identity.is_native() { "native" } else { "managed" };
    println!("Host:      {} ({})", style(identity.name()).cyan(), kind);
    if let DockerHost::Managed(managed) = &host {
        println!("Machine:   {}", managed.machine());
    }
    println!("State:     {}", state_style(host.state()));

    let Some(connection) = host.connection() else {
        println!("Endpoint:  {}", style("not resolved").dim());
        return Ok(());
    };

    println!("Endpoint:  {}", connection.endpoint());
    println!("TLS:       {}", flag_style(connection.require_tls()));
    println!("CA:        {}", connection.ca_certificate_path().display());
    println!("Cert:      {}", connection.client_certificate_path().display());
    println!("Key:       {}", connection.client_key_path().display());
    println!(
        "Resolved:  {}",
        style(connection.resolved_at().format("%Y-%m-%d %H:%M:%S UTC")).dim()
    );

    if args.check {
        match daemon_version(&connection, config).await {
            Ok(version) => println!("Daemon:    {}", style(version).green()),
            Err(e) => println!("Daemon:    {}", style(e).red()),
        }
    }

    Ok(())
}

async fn daemon_version(
    connection: &HostConnection,
    config: &Config,
) -> Result<String, docker_host_core::DockerError> {
    let client = DockerClient::connect(connection, config.daemon_timeout_secs)?;
    client.version().await
}

fn status_json(host: &DockerHost) -> serde_json::Value {
    let identity = host.identity();
    let connection = host.connection().map(|c| {
        serde_json::json!({
            "endpoint": c.endpoint(),
            "require_tls": c.require_tls(),
            "ca_cert_path": c.ca_certificate_path(),
            "client_cert_path": c.client_certificate_path(),
            "client_key_path": c.client_key_path(),
            "resolved_at": c.resolved_at().to_rfc3339(),
        })
    });

    serde_json::json!({
        "name": identity.name(),
        "native": identity.is_native(),
        "state": host.state(),
        "connection": connection,
    })
}
