//! dockerhost host list - List registered hosts

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table};
use console::style;
use docker_host_core::{HostEntry, HostKind, load_hosts};
use docker_host_core::config::get_hosts_path;

/// Arguments for host list command
#[derive(Args)]
pub struct HostListArgs {
    /// Show only host names (for scripting)
    #[arg(long)]
    pub names_only: bool,
}

pub fn cmd_host_list(args: &HostListArgs, quiet: bool) -> Result<()> {
    let hosts = load_hosts()?;

    if hosts.hosts.is_empty() {
        if !quiet && !args.names_only {
            println!("No hosts configured. Commands use the native host from the environment.");
            println!();
            println!(
                "  {} {}",
                style("Add one with:").dim(),
                style("dockerhost host add <name> --machine <machine>").yellow()
            );
        }
        return Ok(());
    }

    if args.names_only || quiet {
        for name in hosts.host_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Kind", "Target", "Description", "Default"]);

    for name in hosts.host_names() {
        let Some(entry) = hosts.get_host(name) else {
            continue;
        };
        let is_default = hosts.default_host.as_deref() == Some(name);

        let name_cell = if is_default {
            Cell::new(name).fg(Color::Cyan)
        } else {
            Cell::new(name)
        };
        let kind = if entry.is_native() { "native" } else { "managed" };

        table.add_row(vec![
            name_cell,
            Cell::new(kind),
            Cell::new(target(name, entry)),
            Cell::new(entry.description.as_deref().unwrap_or("-")),
            Cell::new(if is_default { "*" } else { "" }),
        ]);
    }

    println!("{table}");

    if let Some(default) = &hosts.default_host {
        println!();
        println!(
            "  {} {}",
            style("Default host:").dim(),
            style(default).cyan()
        );
    }

    if let Some(path) = get_hosts_path() {
        println!();
        println!(
            "  {} {}",
            style("Hosts file:").dim(),
            style(path.display()).dim()
        );
    }

    Ok(())
}

/// What a host points at: its endpoint or its machine
fn target(name: &str, entry: &HostEntry) -> String {
    match &entry.kind {
        HostKind::Native { endpoint, .. } => endpoint
            .clone()
            .unwrap_or_else(|| "$DOCKER_HOST".to_string()),
        HostKind::Managed { machine } => {
            format!("machine {}", machine.as_deref().unwrap_or(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_describes_entry() {
        assert_eq!(target("local", &HostEntry::native()), "$DOCKER_HOST");
        assert_eq!(
            target("lab", &HostEntry::native().with_endpoint("tcp://10.0.0.5:2376")),
            "tcp://10.0.0.5:2376"
        );
        assert_eq!(target("dev", &HostEntry::managed()), "machine dev");
        assert_eq!(
            target("dev", &HostEntry::managed().with_machine("vbox")),
            "machine vbox"
        );
    }
}
