//! Host error formatting with actionable guidance

use console::style;
use docker_host_core::{DockerError, HostError, LifecycleState};
use docker_host_core::host::native::{DOCKER_CERT_PATH_ENV, DOCKER_HOST_ENV};

/// Format a host error with a hint for the common cases
pub fn format_host_error(e: &HostError) -> String {
    match e {
        HostError::Configuration { .. } => format!(
            "{}\n\n  {}\n  {}",
            style(e).red().bold(),
            format_args!(
                "Set {} and {}, or register the host with explicit settings:",
                style(DOCKER_HOST_ENV).yellow(),
                style(DOCKER_CERT_PATH_ENV).yellow()
            ),
            style("  dockerhost host add <name> --native --endpoint <uri> --cert-path <dir>")
                .cyan()
        ),
        HostError::CertificateNotFound { .. } | HostError::CertificateParse { .. } => format!(
            "{}\n\n  {}",
            style(e).red().bold(),
            "The certificate directory must hold ca.pem, cert.pem and a matching key.pem."
        ),
        HostError::InvalidState { .. } => format!(
            "{}\n\n  {}",
            style(e).red().bold(),
            "Start and stop the daemon with your platform's service manager instead."
        ),
        HostError::IllegalTransition { host, state, .. } => {
            let hint = match state {
                LifecycleState::Running => format!("Stop it first: dockerhost stop {host}"),
                LifecycleState::Removed => "The machine no longer exists.".to_string(),
                _ => format!("Check its state: dockerhost status {host}"),
            };
            format!("{}\n\n  {}", style(e).red().bold(), hint)
        }
        HostError::Daemon { source, .. } => format_docker_error(e, source),
        HostError::NotFound(name) => format!(
            "{}\n\n  {} {}",
            style(e).red().bold(),
            "Register it with:",
            style(format!("dockerhost host add {name} --machine <machine>")).cyan()
        ),
        HostError::AlreadyExists(name) => format!(
            "{}\n\n  {} {}",
            style(e).red().bold(),
            "Overwrite it with",
            style(format!("dockerhost host add {name} ... --force")).cyan()
        ),
        _ => style(e).red().bold().to_string(),
    }
}

fn format_docker_error(e: &HostError, source: &DockerError) -> String {
    let hint = match source {
        DockerError::NotRunning | DockerError::Timeout => {
            "The daemon did not answer. Check that the host is running."
        }
        DockerError::Tls(_) => "TLS setup failed. Regenerate or re-copy the client certificates.",
        DockerError::PermissionDenied => "Add your user to the 'docker' group, then log in again.",
        _ => return style(e).red().bold().to_string(),
    };
    format!("{}\n\n  {}", style(e).red().bold(), hint)
}

/// Print a host error to stderr in the rich format
pub fn show_host_error(e: &HostError) {
    eprintln!();
    eprintln!("{}", format_host_error(e));
}
