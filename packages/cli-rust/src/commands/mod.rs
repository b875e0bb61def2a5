//! CLI command implementations
//!
//! Host inspection, lifecycle, container listing and registry commands.

mod host;
mod lifecycle;
mod ps;
mod status;

pub use host::{HostArgs, cmd_host};
pub use lifecycle::{RemoveArgs, StartArgs, StopArgs, cmd_remove, cmd_start, cmd_stop};
pub use ps::{PsArgs, cmd_ps};
pub use status::{StatusArgs, cmd_status};
