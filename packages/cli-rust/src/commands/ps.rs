//! ps command implementation
//!
//! Lists containers over the host's resolved connection.

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table};
use console::style;
use docker_host_core::{Config, ContainerHandle, Host, ListOptions};

use crate::output::show_host_error;

/// Container IDs are shown truncated, like `docker ps`
const SHORT_ID_LEN: usize = 12;

/// Arguments for the ps command
#[derive(Args)]
pub struct PsArgs {
    /// Host name (default: registry default, then the environment)
    pub host: Option<String>,

    /// Only running containers
    #[arg(long)]
    pub running: bool,

    /// Daemon filter expression, e.g. "label=tier=web" or "status=exited"
    #[arg(long, short)]
    pub filter: Option<String>,

    /// Fail when the daemon cannot be queried instead of listing nothing
    #[arg(long)]
    pub strict: bool,
}

impl PsArgs {
    fn list_options(&self) -> ListOptions {
        let options = if self.running {
            ListOptions::running()
        } else {
            ListOptions::all()
        };
        match &self.filter {
            Some(filter) => options.with_filter(filter),
            None => options,
        }
    }
}

pub async fn cmd_ps(args: &PsArgs, config: &Config, quiet: bool) -> Result<()> {
    let host = crate::resolve_host(args.host.as_deref(), config)?;
    let options = args.list_options();

    let containers = if args.strict {
        match host.try_list_containers(&options).await {
            Ok(containers) => containers,
            Err(e) => {
                show_host_error(&e);
                return Err(e.into());
            }
        }
    } else {
        host.list_containers(&options).await
    };

    if quiet {
        for container in &containers {
            println!("{}", container.id());
        }
        return Ok(());
    }

    let name = host.identity().name();
    if containers.is_empty() {
        println!(
            "{}",
            style(crate::format_host_message(name, "No containers found.")).dim()
        );
        return Ok(());
    }

    println!("{}", render_table(&containers));
    println!();
    println!(
        "  {} {} on {}",
        style("Containers:").dim(),
        containers.len(),
        style(name).cyan()
    );

    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

fn render_table(containers: &[ContainerHandle]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Container ID", "Name", "Endpoint"]);

    for container in containers {
        table.add_row(vec![
            Cell::new(short_id(container.id())),
            Cell::new(container.name()).fg(Color::Cyan),
            Cell::new(container.connection().endpoint()),
        ]);
    }

    table
}
