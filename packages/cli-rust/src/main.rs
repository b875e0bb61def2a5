//! dockerhost CLI - Inspect and drive Docker hosts
//!
//! This is the main entry point for the Rust CLI binary.

fn main() -> anyhow::Result<()> {
    docker_host::run()
}
