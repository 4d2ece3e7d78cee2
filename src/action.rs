//! Output actions a controller button can map to
//!
//! Actions are stored in the configuration as plain strings: `"z"` for a
//! character key, `"Key.enter"` for a named key, `"Button.left"` for a
//! mouse button. Parsing and serialization round-trip exactly.

use std::fmt;
use std::str::FromStr;

use crate::RiffmapError;

/// Non-printable keys addressable from the configuration as `Key.<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKey {
    Enter,
    Esc,
    Space,
    Tab,
    Backspace,
    Shift,
    Ctrl,
    Alt,
    Up,
    Down,
    Left,
    Right,
}

impl NamedKey {
    /// The `<name>` part of the `Key.<name>` encoding.
    pub fn name(self) -> &'static str {
        match self {
            NamedKey::Enter => "enter",
            NamedKey::Esc => "esc",
            NamedKey::Space => "space",
            NamedKey::Tab => "tab",
            NamedKey::Backspace => "backspace",
            NamedKey::Shift => "shift",
            NamedKey::Ctrl => "ctrl",
            NamedKey::Alt => "alt",
            NamedKey::Up => "up",
            NamedKey::Down => "down",
            NamedKey::Left => "left",
            NamedKey::Right => "right",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "enter" => NamedKey::Enter,
            "esc" => NamedKey::Esc,
            "space" => NamedKey::Space,
            "tab" => NamedKey::Tab,
            "backspace" => NamedKey::Backspace,
            "shift" => NamedKey::Shift,
            "ctrl" => NamedKey::Ctrl,
            "alt" => NamedKey::Alt,
            "up" => NamedKey::Up,
            "down" => NamedKey::Down,
            "left" => NamedKey::Left,
            "right" => NamedKey::Right,
            _ => return None,
        };
        Some(key)
    }
}

/// Mouse buttons addressable from the configuration as `Button.<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn name(self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(MouseButton::Left),
            "right" => Some(MouseButton::Right),
            "middle" => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// The synthetic output a controller button maps to.
///
/// Exactly one variant per value; a key is never also a mouse button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A printable key, sent as a literal key symbol. Single characters are
    /// the expected case; longer strings are accepted and stored verbatim
    /// but the injection layer can only synthesize single symbols.
    Character(String),
    /// A non-printable named key.
    NamedKey(NamedKey),
    /// A mouse button.
    MouseButton(MouseButton),
}

impl FromStr for Action {
    type Err = RiffmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(name) = s.strip_prefix("Key.") {
            return NamedKey::from_name(name)
                .map(Action::NamedKey)
                .ok_or_else(|| RiffmapError::ActionParse(s.to_string()));
        }
        if let Some(name) = s.strip_prefix("Button.") {
            return MouseButton::from_name(name)
                .map(Action::MouseButton)
                .ok_or_else(|| RiffmapError::ActionParse(s.to_string()));
        }
        if s.is_empty() {
            return Err(RiffmapError::ActionParse(s.to_string()));
        }
        Ok(Action::Character(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Character(text) => write!(f, "{}", text),
            Action::NamedKey(key) => write!(f, "Key.{}", key.name()),
            Action::MouseButton(button) => write!(f, "Button.{}", button.name()),
        }
    }
}
