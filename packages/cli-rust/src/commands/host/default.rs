//! dockerhost host default - Set or show the default host

use anyhow::{Result, bail};
use clap::Args;
use console::style;
use docker_host_core::{load_hosts, save_hosts};

use crate::LOCAL_HOST_NAME;

/// Arguments for host default command
#[derive(Args)]
pub struct HostDefaultArgs {
    /// Host to make the default (omit to show current, "local" to clear)
    pub name: Option<String>,
}

pub fn cmd_host_default(args: &HostDefaultArgs, quiet: bool) -> Result<()> {
    let mut hosts = load_hosts()?;

    match &args.name {
        None => {
            let current = hosts.default_host.as_deref().unwrap_or(LOCAL_HOST_NAME);
            if quiet {
                println!("{current}");
            } else if hosts.default_host.is_some() {
                println!("Default host: {}", style(current).cyan());
            } else {
                println!("Default host: {} (environment)", style(current).cyan());
            }
            Ok(())
        }
        Some(name) if name == LOCAL_HOST_NAME && !hosts.has_host(name) => {
            if hosts.default_host.is_none() {
                if !quiet {
                    println!("Default is already the environment host.");
                }
                return Ok(());
            }

            hosts.set_default(None);
            save_hosts(&hosts)?;

            if !quiet {
                println!(
                    "{} Default cleared. Commands will use the native host from the environment.",
                    style("Updated:").green()
                );
            }
            Ok(())
        }
        Some(name) => {
            if !hosts.has_host(name) {
                bail!(
                    "Host '{name}' not found. Register it first with: dockerhost host add {name} --machine <machine>"
                );
            }

            hosts.set_default(Some(name.clone()));
            save_hosts(&hosts)?;

            if !quiet {
                println!(
                    "{} Default host set to '{}'.",
                    style("Updated:").green(),
                    style(name).cyan()
                );
            }
            Ok(())
        }
    }
}
