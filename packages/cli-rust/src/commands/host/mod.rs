//! Host registry subcommands
//!
//! Provides `dockerhost host` subcommands for managing hosts.json.

mod add;
mod default;
mod list;
mod remove;

use anyhow::Result;
use clap::{Args, Subcommand};
use docker_host_core::Config;

pub use add::HostAddArgs;
pub use default::HostDefaultArgs;
pub use list::HostListArgs;
pub use remove::HostRemoveArgs;

/// Host command arguments
#[derive(Args)]
pub struct HostArgs {
    #[command(subcommand)]
    pub command: HostCommands,
}

/// Host management subcommands
#[derive(Subcommand)]
pub enum HostCommands {
    /// Register a native or managed host
    Add(HostAddArgs),
    /// List registered hosts
    List(HostListArgs),
    /// Unregister a host (the machine itself is left alone)
    Remove(HostRemoveArgs),
    /// Show or set the default host
    Default(HostDefaultArgs),
}

pub fn cmd_host(args: &HostArgs, config: &Config, quiet: bool) -> Result<()> {
    match &args.command {
        HostCommands::Add(args) => add::cmd_host_add(args, config, quiet),
        HostCommands::List(args) => list::cmd_host_list(args, quiet),
        HostCommands::Remove(args) => remove::cmd_host_remove(args, quiet),
        HostCommands::Default(args) => default::cmd_host_default(args, quiet),
    }
}
