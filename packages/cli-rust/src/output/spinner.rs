//! Command spinner with elapsed time display
//!
//! Lifecycle operations shell out to the provisioning tool and can take
//! minutes; the spinner keeps the terminal alive meanwhile.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK_CHARS: &str =
    "\u{28CB}\u{2819}\u{2839}\u{2838}\u{283C}\u{2834}\u{2826}\u{2827}\u{2807}\u{280F}";

/// A spinner for host operations, silent in quiet mode
pub struct CommandSpinner {
    bar: Option<ProgressBar>,
}

impl CommandSpinner {
    /// Start a spinner showing `message (MM:SS)`
    pub fn new(message: &str) -> Self {
        let style = ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed_precise:.dim})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS);

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    /// Create a spinner that respects quiet mode
    pub fn new_maybe(message: &str, quiet: bool) -> Self {
        if quiet {
            Self { bar: None }
        } else {
            Self::new(message)
        }
    }

    /// Finish with a green checkmark
    pub fn success(self, message: &str) {
        self.finish(console::style("\u{2713}").green(), message);
    }

    /// Finish with a red X
    pub fn fail(self, message: &str) {
        self.finish(console::style("\u{2717}").red(), message);
    }

    fn finish(self, marker: console::StyledObject<&str>, message: &str) {
        if let Some(bar) = self.bar {
            bar.finish_with_message(format!("{marker} {message}"));
        }
    }
}
