//! Start, stop and remove commands for managed hosts
//!
//! Start and stop are idempotent: a host already in the target state exits 0.

use anyhow::Result;
use clap::Args;
use console::style;
use dialoguer::Confirm;
use docker_host_core::{Config, DockerHost, Host, HostError, LifecycleState};

use crate::format_host_message;
use crate::output::{CommandSpinner, show_host_error};

/// Arguments for the start command
#[derive(Args)]
pub struct StartArgs {
    /// Host name
    pub host: String,
}

/// Arguments for the stop command
#[derive(Args)]
pub struct StopArgs {
    /// Host name
    pub host: String,
}

/// Arguments for the remove command
#[derive(Args)]
pub struct RemoveArgs {
    /// Host name
    pub host: String,

    /// Remove even if the machine is running, without confirmation
    #[arg(long, short)]
    pub force: bool,
}

pub fn cmd_start(args: &StartArgs, config: &Config, quiet: bool) -> Result<()> {
    let mut host = crate::resolve_host(Some(&args.host), config)?;
    let name = host.identity().name().to_string();

    if !host.is_native() && host.state() == LifecycleState::Running {
        if !quiet {
            let msg = format_host_message(&name, "Host is already running");
            println!("{}", style(msg).dim());
        }
        return Ok(());
    }

    let spinner = CommandSpinner::new_maybe(&format_host_message(&name, "Starting host..."), quiet);
    match host.start() {
        Ok(()) => {
            let message = match host.connection() {
                Some(connection) => format!("Host started at {}", connection.endpoint()),
                None => "Host started, but its connection could not be resolved".to_string(),
            };
            spinner.success(&format_host_message(&name, &message));
            Ok(())
        }
        Err(e) => fail(spinner, &name, "Failed to start", e),
    }
}

pub fn cmd_stop(args: &StopArgs, config: &Config, quiet: bool) -> Result<()> {
    let mut host = crate::resolve_host(Some(&args.host), config)?;
    let name = host.identity().name().to_string();

    if !host.is_native() && host.state() == LifecycleState::Stopped {
        if !quiet {
            let msg = format_host_message(&name, "Host is already stopped");
            println!("{}", style(msg).dim());
        }
        return Ok(());
    }

    let spinner = CommandSpinner::new_maybe(&format_host_message(&name, "Stopping host..."), quiet);
    match host.stop() {
        Ok(()) => {
            spinner.success(&format_host_message(&name, "Host stopped"));
            Ok(())
        }
        Err(e) => fail(spinner, &name, "Failed to stop", e),
    }
}

pub fn cmd_remove(args: &RemoveArgs, config: &Config, quiet: bool) -> Result<()> {
    let mut host = crate::resolve_host(Some(&args.host), config)?;
    let name = host.identity().name().to_string();

    if needs_confirmation(args, host.is_native()) && !confirm_remove(&host)? {
        if !quiet {
            println!("Cancelled.");
        }
        return Ok(());
    }

    let spinner = CommandSpinner::new_maybe(&format_host_message(&name, "Removing host..."), quiet);
    match host.remove(args.force) {
        Ok(()) => {
            spinner.success(&format_host_message(&name, "Host removed"));
            Ok(())
        }
        Err(e) => fail(spinner, &name, "Failed to remove", e),
    }
}

/// Whether removal must be confirmed interactively
///
/// Only `--force` skips the prompt. Native hosts reject removal outright.
fn needs_confirmation(args: &RemoveArgs, is_native: bool) -> bool {
    !args.force && !is_native
}

fn confirm_remove(host: &DockerHost) -> Result<bool> {
    let machine = match host {
        DockerHost::Managed(managed) => managed.machine(),
        DockerHost::Native(_) => host.identity().name(),
    };

    let confirmed = Confirm::new()
        .with_prompt(format!(
            "Permanently delete machine '{machine}' and all of its containers?"
        ))
        .default(false)
        .interact()?;
    Ok(confirmed)
}

fn fail(spinner: CommandSpinner, name: &str, message: &str, e: HostError) -> Result<()> {
    spinner.fail(&format_host_message(name, message));
    show_host_error(&e);
    Err(e.into())
}
