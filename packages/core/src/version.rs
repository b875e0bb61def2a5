//! Version information for docker-host

use bollard::API_DEFAULT_VERSION;

/// Get the current version string
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Docker Engine API version requested from daemons
pub fn get_api_version() -> String {
    format!(
        "{}.{}",
        API_DEFAULT_VERSION.major_version, API_DEFAULT_VERSION.minor_version
    )
}

/// Get the long version string with build information
///
/// CI may set DOCKER_HOST_GIT_HASH and DOCKER_HOST_BUILD_DATE at build time.
pub fn get_version_long() -> String {
    let git_hash = option_env!("DOCKER_HOST_GIT_HASH").unwrap_or("unknown");
    let build_date = option_env!("DOCKER_HOST_BUILD_DATE").unwrap_or("unknown");

    format!(
        "{} (docker api: {}, git: {git_hash}, built: {build_date})",
        get_version(),
        get_api_version()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_version_returns_valid_semver() {
        let version = get_version();
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_get_version_long_contains_versions() {
        let long = get_version_long();
        assert!(long.contains(&get_version()));
        assert!(long.contains(&format!("docker api: {}", get_api_version())));
    }
}
