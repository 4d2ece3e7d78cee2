//! Input injection using rdev
//!
//! Sends synthetic keyboard/mouse events through rdev's simulate API.
//! Stateless: each press/release is independent and no retries are made;
//! a refused event is reported and dropped.

use rdev::{simulate, EventType, SimulateError};
use tracing::debug;

use crate::action::{Action, MouseButton, NamedKey};
use crate::RiffmapError;

/// Press/release sink the dispatcher drives. Implemented by [`RdevInjector`]
/// for real output and by recording fakes in tests.
pub trait Injector {
    fn press(&mut self, action: &Action) -> Result<(), RiffmapError>;
    fn release(&mut self, action: &Action) -> Result<(), RiffmapError>;
}

/// Convert a named key to the rdev key it synthesizes as.
fn named_key_to_rdev(key: NamedKey) -> rdev::Key {
    match key {
        NamedKey::Enter => rdev::Key::Return,
        NamedKey::Esc => rdev::Key::Escape,
        NamedKey::Space => rdev::Key::Space,
        NamedKey::Tab => rdev::Key::Tab,
        NamedKey::Backspace => rdev::Key::Backspace,
        NamedKey::Shift => rdev::Key::ShiftLeft,
        NamedKey::Ctrl => rdev::Key::ControlLeft,
        NamedKey::Alt => rdev::Key::Alt,
        NamedKey::Up => rdev::Key::UpArrow,
        NamedKey::Down => rdev::Key::DownArrow,
        NamedKey::Left => rdev::Key::LeftArrow,
        NamedKey::Right => rdev::Key::RightArrow,
    }
}

fn mouse_button_to_rdev(button: MouseButton) -> rdev::Button {
    match button {
        MouseButton::Left => rdev::Button::Left,
        MouseButton::Right => rdev::Button::Right,
        MouseButton::Middle => rdev::Button::Middle,
    }
}

/// Map a single character to an rdev key (US layout).
fn char_to_key(c: char) -> Option<rdev::Key> {
    use rdev::Key;
    let key = match c.to_ascii_lowercase() {
        'a' => Key::KeyA,
        'b' => Key::KeyB,
        'c' => Key::KeyC,
        'd' => Key::KeyD,
        'e' => Key::KeyE,
        'f' => Key::KeyF,
        'g' => Key::KeyG,
        'h' => Key::KeyH,
        'i' => Key::KeyI,
        'j' => Key::KeyJ,
        'k' => Key::KeyK,
        'l' => Key::KeyL,
        'm' => Key::KeyM,
        'n' => Key::KeyN,
        'o' => Key::KeyO,
        'p' => Key::KeyP,
        'q' => Key::KeyQ,
        'r' => Key::KeyR,
        's' => Key::KeyS,
        't' => Key::KeyT,
        'u' => Key::KeyU,
        'v' => Key::KeyV,
        'w' => Key::KeyW,
        'x' => Key::KeyX,
        'y' => Key::KeyY,
        'z' => Key::KeyZ,
        '0' => Key::Num0,
        '1' => Key::Num1,
        '2' => Key::Num2,
        '3' => Key::Num3,
        '4' => Key::Num4,
        '5' => Key::Num5,
        '6' => Key::Num6,
        '7' => Key::Num7,
        '8' => Key::Num8,
        '9' => Key::Num9,
        ' ' => Key::Space,
        '-' => Key::Minus,
        '=' => Key::Equal,
        '[' => Key::LeftBracket,
        ']' => Key::RightBracket,
        ';' => Key::SemiColon,
        '\'' => Key::Quote,
        '\\' => Key::BackSlash,
        ',' => Key::Comma,
        '.' => Key::Dot,
        '/' => Key::Slash,
        '`' => Key::BackQuote,
        _ => return None,
    };
    Some(key)
}

/// The rdev event for one half of an action's press/release pair.
fn event_for(action: &Action, press: bool) -> Result<EventType, RiffmapError> {
    match action {
        Action::Character(text) => {
            let mut chars = text.chars();
            let key = match (chars.next().and_then(char_to_key), chars.next()) {
                (Some(key), None) => key,
                _ => {
                    return Err(RiffmapError::Injection(format!(
                        "cannot synthesize key symbol '{}'",
                        text
                    )))
                }
            };
            Ok(if press {
                EventType::KeyPress(key)
            } else {
                EventType::KeyRelease(key)
            })
        }
        Action::NamedKey(key) => {
            let key = named_key_to_rdev(*key);
            Ok(if press {
                EventType::KeyPress(key)
            } else {
                EventType::KeyRelease(key)
            })
        }
        Action::MouseButton(button) => {
            let button = mouse_button_to_rdev(*button);
            Ok(if press {
                EventType::ButtonPress(button)
            } else {
                EventType::ButtonRelease(button)
            })
        }
    }
}

fn send(event: EventType) -> Result<(), RiffmapError> {
    simulate(&event)
        .map_err(|_: SimulateError| RiffmapError::Injection(format!("platform refused {:?}", event)))
}

/// Injector that delivers real synthetic input via rdev.
#[derive(Debug, Default)]
pub struct RdevInjector;

impl RdevInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Injector for RdevInjector {
    fn press(&mut self, action: &Action) -> Result<(), RiffmapError> {
        let event = event_for(action, true)?;
        debug!("Injecting {:?}", event);
        send(event)
    }

    fn release(&mut self, action: &Action) -> Result<(), RiffmapError> {
        let event = event_for(action, false)?;
        debug!("Injecting {:?}", event);
        send(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_maps_to_key_events() {
        let action = Action::Character("z".into());
        assert_eq!(
            event_for(&action, true).unwrap(),
            EventType::KeyPress(rdev::Key::KeyZ)
        );
        assert_eq!(
            event_for(&action, false).unwrap(),
            EventType::KeyRelease(rdev::Key::KeyZ)
        );
    }

    #[test]
    fn named_key_maps_to_key_events() {
        let action = Action::NamedKey(NamedKey::Enter);
        assert_eq!(
            event_for(&action, true).unwrap(),
            EventType::KeyPress(rdev::Key::Return)
        );
    }

    #[test]
    fn mouse_button_maps_to_button_events() {
        let action = Action::MouseButton(MouseButton::Left);
        assert_eq!(
            event_for(&action, true).unwrap(),
            EventType::ButtonPress(rdev::Button::Left)
        );
        assert_eq!(
            event_for(&action, false).unwrap(),
            EventType::ButtonRelease(rdev::Button::Left)
        );
    }

    #[test]
    fn multi_character_symbol_is_an_injection_error() {
        let action = Action::Character("zz".into());
        assert!(matches!(
            event_for(&action, true),
            Err(RiffmapError::Injection(_))
        ));
    }

    #[test]
    fn unmappable_character_is_an_injection_error() {
        let action = Action::Character("é".into());
        assert!(event_for(&action, true).is_err());
    }
}
