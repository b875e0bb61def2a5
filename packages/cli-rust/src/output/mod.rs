//! Output utilities for CLI commands
//!
//! Spinners for long-running lifecycle operations, consistent state
//! colors, and rich host error formatting.

pub mod colors;
pub mod errors;
pub mod spinner;

pub use colors::{flag_style, state_style};
pub use errors::{format_host_error, show_host_error};
pub use spinner::CommandSpinner;
