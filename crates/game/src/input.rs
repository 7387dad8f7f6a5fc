//! Input events and the intent they leave behind.
//!
//! Events arrive asynchronously from the host; the controller folds them
//! into an [`Intent`] that the next frame update consumes.

use serde::{Deserialize, Serialize};

/// Keys the gameplay layer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    S,
    A,
    D,
    C,
    G,
    Space,
    LShift,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A raw input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Relative mouse motion.
    MouseMove { dx: f32, dy: f32 },
    KeyDown(Key),
    KeyUp(Key),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    /// Wheel clicks, positive away from the user.
    MouseWheel(i32),
}

/// Held-input state between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub move_forward: bool,
    pub move_backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub crouch: bool,
    pub run: bool,
    pub shoot: bool,
    /// Set on jump press, cleared on release. Prevents bunny hopping by
    /// holding the key.
    pub jumped: bool,
}

impl Intent {
    /// Update a held flag for a movement key. Returns false for keys that
    /// are not held-state keys.
    pub fn set_key(&mut self, key: Key, down: bool) -> bool {
        let flag = match key {
            Key::W => &mut self.move_forward,
            Key::S => &mut self.move_backward,
            Key::A => &mut self.strafe_left,
            Key::D => &mut self.strafe_right,
            Key::C => &mut self.crouch,
            Key::LShift => &mut self.run,
            _ => return false,
        };
        *flag = down;
        true
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.move_forward || self.move_backward || self.strafe_left || self.strafe_right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_toggles_flag() {
        let mut intent = Intent::default();
        assert!(intent.set_key(Key::W, true));
        assert!(intent.move_forward);
        assert!(intent.has_movement());

        intent.set_key(Key::W, false);
        assert!(!intent.has_movement());
    }

    #[test]
    fn test_non_held_keys_ignored() {
        let mut intent = Intent::default();
        assert!(!intent.set_key(Key::G, true));
        assert!(!intent.set_key(Key::Space, true));
        assert_eq!(intent, Intent::default());
    }

    #[test]
    fn test_crouch_and_run_are_not_movement() {
        let mut intent = Intent::default();
        intent.set_key(Key::C, true);
        intent.set_key(Key::LShift, true);
        assert!(intent.crouch && intent.run);
        assert!(!intent.has_movement());
    }
}
