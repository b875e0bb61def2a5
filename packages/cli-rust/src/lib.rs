//! dockerhost CLI - Inspect and drive Docker hosts
//!
//! This module contains the shared CLI implementation used by the binary.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use docker_host_core::{
    Config, DockerHost, Host, HostError, config, get_version, get_version_long, load_config,
    load_hosts,
};
use tracing_subscriber::EnvFilter;

/// Name used for the host built from the process environment
pub(crate) const LOCAL_HOST_NAME: &str = "local";

/// Inspect and drive native and machine-managed Docker hosts
#[derive(Parser)]
#[command(name = "dockerhost")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and drive native and machine-managed Docker hosts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a host's state and connection
    Status(commands::StatusArgs),
    /// Start a managed host
    Start(commands::StartArgs),
    /// Stop a managed host
    Stop(commands::StopArgs),
    /// Remove a managed host's machine
    Remove(commands::RemoveArgs),
    /// List containers on a host
    Ps(commands::PsArgs),
    /// Manage registered hosts
    Host(commands::HostArgs),
}

/// Map CLI verbosity to a tracing filter
///
/// RUST_LOG takes precedence when set.
fn log_filter(verbose: u8, quiet: bool) -> EnvFilter {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, cli.quiet))
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let config_path = config::get_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

    let config = match load_config() {
        Ok(config) => {
            if cli.verbose > 0 {
                eprintln!(
                    "{} Config loaded from: {}",
                    style("[info]").cyan(),
                    config_path.display()
                );
            }
            config
        }
        Err(e) => {
            eprintln!("{} Configuration error", style("Error:").red().bold());
            eprintln!();
            eprintln!("  {e}");
            eprintln!();
            eprintln!("  Config file: {}", style(config_path.display()).yellow());
            eprintln!();
            eprintln!(
                "  {} Check the config file for syntax errors or unknown fields.",
                style("Tip:").cyan()
            );
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Status(args)) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_status(&args, &config, cli.quiet))
        }
        Some(Commands::Start(args)) => commands::cmd_start(&args, &config, cli.quiet),
        Some(Commands::Stop(args)) => commands::cmd_stop(&args, &config, cli.quiet),
        Some(Commands::Remove(args)) => commands::cmd_remove(&args, &config, cli.quiet),
        Some(Commands::Ps(args)) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_ps(&args, &config, cli.quiet))
        }
        Some(Commands::Host(args)) => commands::cmd_host(&args, &config, cli.quiet),
        None => {
            if !cli.quiet {
                println!(
                    "{} {}",
                    style("dockerhost").cyan().bold(),
                    style(if cli.verbose > 0 { get_version_long() } else { get_version() }).dim()
                );
                println!();
                println!("Run {} for available commands.", style("--help").green());
            }
            Ok(())
        }
    }
}

/// Resolve the host a command targets
///
/// An explicit name is looked up in the registry, except `local` when no such
/// entry exists. Without a name the registry default is used, and without a
/// default a native host is built from the environment.
pub(crate) fn resolve_host(maybe_host: Option<&str>, config: &Config) -> Result<DockerHost> {
    let hosts = load_hosts()?;
    let name = maybe_host
        .map(str::to_string)
        .or_else(|| hosts.default_host.clone());

    let host = match name {
        Some(name) => match hosts.get_host(&name) {
            Some(entry) => DockerHost::from_entry(&name, entry, config)?,
            None if name == LOCAL_HOST_NAME => DockerHost::from_env(LOCAL_HOST_NAME, config)?,
            None => return Err(HostError::NotFound(name).into()),
        },
        None => DockerHost::from_env(LOCAL_HOST_NAME, config)?,
    };

    tracing::debug!("Resolved target host: {}", host.identity().name());
    Ok(host)
}

/// Prefix a message with the host name
pub(crate) fn format_host_message(host_name: &str, message: &str) -> String {
    format!("[{}] {}", style(host_name).cyan(), message)
}
