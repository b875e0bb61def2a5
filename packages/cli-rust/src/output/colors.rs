//! Color utilities for CLI output

use console::{Style, StyledObject};
use docker_host_core::LifecycleState;

/// Style a lifecycle state with its conventional color
pub fn state_style(state: LifecycleState) -> StyledObject<String> {
    let style = match state {
        LifecycleState::Running => Style::new().green().bold(),
        LifecycleState::Stopped => Style::new().yellow(),
        LifecycleState::Removed => Style::new().red(),
        LifecycleState::Unknown => Style::new().dim(),
    };
    style.apply_to(state.to_string())
}

/// Style a yes/no flag, highlighting `yes`
pub fn flag_style(enabled: bool) -> StyledObject<&'static str> {
    if enabled {
        Style::new().green().apply_to("yes")
    } else {
        Style::new().dim().apply_to("no")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // StyledObject::to_string() includes ANSI codes when colors are enabled,
    // so tests check the text with contains().

    #[test]
    fn state_style_keeps_state_name() {
        for (state, text) in [
            (LifecycleState::Running, "running"),
            (LifecycleState::Stopped, "stopped"),
            (LifecycleState::Removed, "removed"),
            (LifecycleState::Unknown, "unknown"),
        ] {
            assert!(state_style(state).to_string().contains(text));
        }
    }

    #[test]
    fn flag_style_text() {
        assert!(flag_style(true).to_string().contains("yes"));
        assert!(flag_style(false).to_string().contains("no"));
    }
}
