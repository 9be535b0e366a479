use crate::{foundation::core::PageNumber, navigation::guard::NavCommand};

/// Clicks at or left of this fraction of the surface width go back.
pub const PREVIOUS_ZONE_MAX: f64 = 0.4;
/// Clicks at or right of this fraction of the surface width go forward.
pub const NEXT_ZONE_MIN: f64 = 0.6;

#[derive(Clone, Debug, PartialEq)]
/// Raw navigation input as delivered by the input-binding layer.
pub enum NavInput {
    /// Key press.
    Key {
        /// DOM-style key name (`ArrowLeft`, `Home`, ...).
        key: String,
        /// Auto-repeat from a held key.
        repeat: bool,
    },
    /// Click on the page surface.
    Click {
        /// Horizontal position in `[0, 1]` across the surface width.
        relative_x: f64,
    },
    /// Already-normalized command (remote control, buttons).
    Command(NavCommand),
}

impl NavInput {
    /// Non-repeating key press.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key {
            key: key.into(),
            repeat: false,
        }
    }

    /// Whether this is auto-repeat input.
    pub fn is_repeat(&self) -> bool {
        matches!(self, Self::Key { repeat: true, .. })
    }

    /// Reduce to a [`NavCommand`]; `None` for inputs that do not navigate.
    pub fn to_command(&self, current: PageNumber, pages: &[PageNumber]) -> Option<NavCommand> {
        match self {
            Self::Key { key, .. } => command_for_key(key),
            Self::Click { relative_x } => command_for_click(*relative_x, current, pages),
            Self::Command(c) => Some(*c),
        }
    }
}

/// Map a DOM-style key name; unbound keys yield `None`.
pub fn command_for_key(key: &str) -> Option<NavCommand> {
    match key {
        "ArrowLeft" => Some(NavCommand::Previous),
        "ArrowRight" => Some(NavCommand::Next),
        "Home" => Some(NavCommand::First),
        "End" => Some(NavCommand::Last),
        _ => None,
    }
}

/// Map a surface click to a step, only when a neighbouring page exists in that direction.
pub fn command_for_click(
    relative_x: f64,
    current: PageNumber,
    pages: &[PageNumber],
) -> Option<NavCommand> {
    if !relative_x.is_finite() {
        return None;
    }
    let index = pages.iter().position(|p| *p == current)?;
    if relative_x <= PREVIOUS_ZONE_MAX && index > 0 {
        Some(NavCommand::Previous)
    } else if relative_x >= NEXT_ZONE_MIN && index + 1 < pages.len() {
        Some(NavCommand::Next)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/navigation/input.rs"]
mod tests;
