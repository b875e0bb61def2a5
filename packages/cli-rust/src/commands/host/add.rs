//! dockerhost host add - Register a native or managed host

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{ArgGroup, Args};
use console::style;
use docker_host_core::{Config, DockerHost, Host, HostEntry, HostError, load_hosts, save_hosts};

use crate::output::{CommandSpinner, show_host_error, state_style};

/// Arguments for host add command
#[derive(Args)]
#[command(group(ArgGroup::new("kind").required(true).args(["native", "machine"])))]
pub struct HostAddArgs {
    /// Name to identify this host (e.g., "dev", "ci")
    pub name: String,

    /// Daemon reached directly; unset settings fall back to the environment
    #[arg(long)]
    pub native: bool,

    /// Daemon endpoint URI (native only)
    #[arg(long, conflicts_with = "machine")]
    pub endpoint: Option<String>,

    /// Directory holding ca.pem, cert.pem and key.pem (native only)
    #[arg(long, conflicts_with = "machine")]
    pub cert_path: Option<PathBuf>,

    /// Provisioned machine backing this host
    #[arg(long, short)]
    pub machine: Option<String>,

    /// Description for this host
    #[arg(short, long)]
    pub description: Option<String>,

    /// Also make this the default host
    #[arg(long)]
    pub default: bool,

    /// Skip resolving the host before saving
    #[arg(long)]
    pub no_verify: bool,

    /// Overwrite if host already exists
    #[arg(long)]
    pub force: bool,
}

impl HostAddArgs {
    fn entry(&self) -> HostEntry {
        let mut entry = match &self.machine {
            Some(machine) => HostEntry::managed().with_machine(machine),
            None => HostEntry::native(),
        };
        if let Some(endpoint) = &self.endpoint {
            entry = entry.with_endpoint(endpoint);
        }
        if let Some(cert_path) = &self.cert_path {
            entry = entry.with_cert_path(cert_path);
        }
        if let Some(desc) = &self.description {
            entry = entry.with_description(desc);
        }
        entry
    }
}

pub fn cmd_host_add(args: &HostAddArgs, config: &Config, quiet: bool) -> Result<()> {
    let mut hosts = load_hosts()?;

    if hosts.has_host(&args.name) && !args.force {
        let err = HostError::AlreadyExists(args.name.clone());
        show_host_error(&err);
        return Err(err.into());
    }

    let entry = args.entry();

    if !args.no_verify {
        let spinner =
            CommandSpinner::new_maybe(&format!("Resolving host '{}'...", args.name), quiet);
        match DockerHost::from_entry(&args.name, &entry, config) {
            Ok(host) => {
                let detail = match host.connection() {
                    Some(connection) => connection.endpoint().to_string(),
                    None => "no connection".to_string(),
                };
                spinner.success(&format!("Resolved ({}, {detail})", state_style(host.state())));
            }
            Err(e) => {
                spinner.fail("Resolution failed");
                show_host_error(&e);
                bail!("Host verification failed. Use --no-verify to add it anyway.");
            }
        }
    }

    let is_overwrite = hosts.has_host(&args.name);
    hosts.add_host(&args.name, entry);
    if args.default {
        hosts.set_default(Some(args.name.clone()));
    }
    save_hosts(&hosts)?;

    if !quiet {
        let (label, verb) = if is_overwrite {
            (style("Updated:").yellow(), "updated")
        } else {
            (style("Added:").green(), "added")
        };
        println!("{} Host '{}' {}.", label, style(&args.name).cyan(), verb);

        if args.no_verify {
            println!(
                "  {} Host not verified. Run {} to check it.",
                style("Note:").dim(),
                style(format!("dockerhost status {}", args.name)).yellow()
            );
        }
    }

    Ok(())
}
