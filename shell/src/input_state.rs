use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use meshtext_geometry::Vector2;

/// The keys applications can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    W,
    A,
    S,
    D,
}

impl Key {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        Some(match code {
            KeyCode::Escape => Key::Escape,
            KeyCode::Space => Key::Space,
            KeyCode::KeyW => Key::W,
            KeyCode::KeyA => Key::A,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyD => Key::D,
            _ => return None,
        })
    }
}

/// Pressed keys and cursor position, tracked from window events.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    pressed: HashSet<Key>,
    cursor_position: Option<Vector2>,
}

impl InputState {
    pub fn apply(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = Key::from_key_code(*code) {
                    self.set_pressed(key, *state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = Some(Vector2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor_position = None,
            // Releases are not delivered to unfocused windows.
            WindowEvent::Focused(false) => self.pressed.clear(),
            _ => {}
        }
    }

    pub fn set_pressed(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.pressed.insert(key);
        } else {
            self.pressed.remove(&key);
        }
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Cursor position in physical pixels, origin top left. `None` if outside the window.
    pub fn cursor_position(&self) -> Option<Vector2> {
        self.cursor_position
    }
}

#[cfg(test)]
mod tests {
    use winit::{event::WindowEvent, keyboard::KeyCode};

    use super::*;

    #[test]
    fn maps_the_supported_key_codes() {
        assert_eq!(Key::from_key_code(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(Key::from_key_code(KeyCode::KeyW), Some(Key::W));
        assert_eq!(Key::from_key_code(KeyCode::KeyQ), None);
    }

    #[test]
    fn tracks_press_and_release() {
        let mut input = InputState::default();
        assert!(!input.is_pressed(Key::Space));

        input.set_pressed(Key::Space, true);
        input.set_pressed(Key::A, true);
        assert!(input.is_pressed(Key::Space));

        input.set_pressed(Key::Space, false);
        assert!(!input.is_pressed(Key::Space));
        assert!(input.is_pressed(Key::A));
    }

    #[test]
    fn losing_focus_releases_all_keys() {
        let mut input = InputState::default();
        input.set_pressed(Key::W, true);
        input.apply(&WindowEvent::Focused(false));
        assert!(!input.is_pressed(Key::W));
    }
}
