//! dockerhost host remove - Unregister a host

use anyhow::Result;
use clap::Args;
use console::style;
use docker_host_core::{HostError, load_hosts, save_hosts};

/// Arguments for host remove command
#[derive(Args)]
pub struct HostRemoveArgs {
    /// Name of the host to unregister
    pub name: String,
}

pub fn cmd_host_remove(args: &HostRemoveArgs, quiet: bool) -> Result<()> {
    let mut hosts = load_hosts()?;

    let was_default = hosts.default_host.as_deref() == Some(args.name.as_str());
    if hosts.remove_host(&args.name).is_none() {
        return Err(HostError::NotFound(args.name.clone()).into());
    }
    save_hosts(&hosts)?;

    if !quiet {
        println!(
            "{} Host '{}' unregistered.",
            style("Removed:").green(),
            style(&args.name).cyan()
        );
        if was_default {
            println!(
                "  {} Default cleared. Commands will use the native host from the environment.",
                style("Note:").dim()
            );
        }
    }

    Ok(())
}
