//! XDG-compliant path resolution for docker-host
//!
//! Provides consistent path resolution across platforms:
//! - Linux/macOS: ~/.config/docker-host/
//! - Windows: %APPDATA%\docker-host\

use std::path::PathBuf;

const APP_DIR_NAME: &str = "docker-host";

/// Get the configuration directory path
///
/// Returns the directory where config.json and hosts.json are stored:
/// - Linux: `~/.config/docker-host/`
/// - macOS: `~/.config/docker-host/` (XDG-style, not ~/Library)
/// - Windows: `%APPDATA%\docker-host\`
pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".config").join(APP_DIR_NAME))
    }
    #[cfg(target_os = "windows")]
    {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .map(|d| d.join(APP_DIR_NAME))
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        None
    }
}

/// Get the full path to the config file
///
/// Returns: `{config_dir}/config.json`
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("config.json"))
}

/// Get the full path to the hosts registry file
///
/// Returns: `{config_dir}/hosts.json`
pub fn get_hosts_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("hosts.json"))
}
