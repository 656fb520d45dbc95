/// Platform-agnostic input handling system
use std::collections::HashSet;

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    FocusLost,
    CloseRequested,
}

/// What a key-down edge means for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TurnLeft,
    TurnRight,
    Exit,
}

/// Tracks held keys so that a key-down only counts once until it is released.
pub struct InputState {
    pub pressed_keys: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
        }
    }

    /// Process an input event and return the key that just went down, if
    /// any. Repeated key-downs for a held key return `None`.
    pub fn process_event<'a>(&mut self, event: &'a InputEvent) -> Option<&'a str> {
        match event {
            InputEvent::KeyDown(key) => {
                if self.pressed_keys.insert(key.clone()) {
                    Some(key.as_str())
                } else {
                    None
                }
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(key.as_str());
                None
            }
            InputEvent::FocusLost => {
                self.clear_keys();
                None
            }
            InputEvent::CloseRequested => None,
        }
    }

    #[cfg(test)]
    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Key mapping configuration. The `_alt` keys are optional second bindings.
#[derive(Clone)]
pub struct KeyBindings {
    pub turn_left: String,
    pub turn_right: String,
    pub turn_left_alt: Option<String>,
    pub turn_right_alt: Option<String>,
    pub escape: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            turn_left: "a".to_string(),
            turn_right: "d".to_string(),
            turn_left_alt: Some("ArrowLeft".to_string()),
            turn_right_alt: Some("ArrowRight".to_string()),
            escape: "Escape".to_string(),
        }
    }
}

fn matches_binding(key: &str, primary: &str, alt: Option<&str>) -> bool {
    key.eq_ignore_ascii_case(primary) || alt == Some(key)
}

/// High-level input processor
#[derive(Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn is_turn_left(&self, key: &str) -> bool {
        matches_binding(key, &self.bindings.turn_left, self.bindings.turn_left_alt.as_deref())
    }

    pub fn is_turn_right(&self, key: &str) -> bool {
        matches_binding(key, &self.bindings.turn_right, self.bindings.turn_right_alt.as_deref())
    }

    pub fn is_escape(&self, key: &str) -> bool {
        key == self.bindings.escape
    }

    pub fn action_for_key(&self, key: &str) -> Option<Action> {
        if self.is_turn_left(key) {
            Some(Action::TurnLeft)
        } else if self.is_turn_right(key) {
            Some(Action::TurnRight)
        } else if self.is_escape(key) {
            Some(Action::Exit)
        } else {
            None
        }
    }

    /// Run an event through the edge detector and map the result.
    pub fn translate(&self, input: &mut InputState, event: &InputEvent) -> Option<Action> {
        if *event == InputEvent::CloseRequested {
            return Some(Action::Exit);
        }
        input
            .process_event(event)
            .and_then(|key| self.action_for_key(key))
    }
}

pub mod native {
    use super::InputEvent;
    use winit::event::{ElementState, KeyEvent};
    use winit::keyboard::{KeyCode, PhysicalKey};

    /// Name a physical key the way `KeyBindings` spells it.
    pub fn key_name(code: KeyCode) -> Option<&'static str> {
        let name = match code {
            KeyCode::KeyA => "a",
            KeyCode::KeyD => "d",
            KeyCode::ArrowLeft => "ArrowLeft",
            KeyCode::ArrowRight => "ArrowRight",
            KeyCode::Escape => "Escape",
            _ => return None,
        };
        Some(name)
    }

    pub fn keyboard_event_to_input(event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        let key = key_name(code)?.to_string();
        Some(match event.state {
            ElementState::Pressed => InputEvent::KeyDown(key),
            ElementState::Released => InputEvent::KeyUp(key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(k: &str) -> InputEvent {
        InputEvent::KeyDown(k.to_string())
    }

    fn up(k: &str) -> InputEvent {
        InputEvent::KeyUp(k.to_string())
    }

    #[test]
    fn held_key_fires_once() {
        let proc = InputProcessor::default();
        let mut input = InputState::new();

        assert_eq!(proc.translate(&mut input, &down("a")), Some(Action::TurnLeft));
        // OS auto-repeat while held
        assert_eq!(proc.translate(&mut input, &down("a")), None);
        assert_eq!(proc.translate(&mut input, &down("a")), None);
        assert!(input.is_key_pressed("a"));

        assert_eq!(proc.translate(&mut input, &up("a")), None);
        assert_eq!(proc.translate(&mut input, &down("a")), Some(Action::TurnLeft));
    }

    #[test]
    fn keys_are_independent() {
        let proc = InputProcessor::default();
        let mut input = InputState::new();
        assert_eq!(proc.translate(&mut input, &down("a")), Some(Action::TurnLeft));
        assert_eq!(proc.translate(&mut input, &down("d")), Some(Action::TurnRight));
        assert_eq!(proc.translate(&mut input, &down("ArrowRight")), Some(Action::TurnRight));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let proc = InputProcessor::default();
        let mut input = InputState::new();
        proc.translate(&mut input, &down("d"));
        proc.translate(&mut input, &InputEvent::FocusLost);
        assert!(input.pressed_keys.is_empty());
        assert_eq!(proc.translate(&mut input, &down("d")), Some(Action::TurnRight));
    }

    #[test]
    fn exit_signals() {
        let proc = InputProcessor::default();
        let mut input = InputState::new();
        assert_eq!(proc.translate(&mut input, &down("Escape")), Some(Action::Exit));
        assert_eq!(proc.translate(&mut input, &InputEvent::CloseRequested), Some(Action::Exit));
        assert_eq!(proc.translate(&mut input, &down("q")), None);
    }

    #[test]
    fn custom_bindings() {
        let proc = InputProcessor::new(KeyBindings {
            turn_left: "j".to_string(),
            turn_right: "l".to_string(),
            turn_left_alt: None,
            turn_right_alt: Some("k".to_string()),
            escape: "Escape".to_string(),
        });
        assert_eq!(proc.action_for_key("J"), Some(Action::TurnLeft));
        assert_eq!(proc.action_for_key("a"), None);
        assert_eq!(proc.action_for_key("k"), Some(Action::TurnRight));
        // unbound alternates are really gone
        assert_eq!(proc.action_for_key("ArrowLeft"), None);
        assert_eq!(proc.action_for_key("ArrowRight"), None);
    }
}
