//! Keyboard input state

use std::collections::{HashMap, HashSet};
use winit::keyboard::KeyCode;

/// Tracks keyboard state per frame and resolves named actions
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down
    keys_down: HashSet<KeyCode>,
    /// Keys pressed this frame
    keys_just_pressed: HashSet<KeyCode>,
    /// Action map: action name -> list of key bindings
    action_map: HashMap<String, Vec<KeyCode>>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an action to one or more keys, replacing earlier bindings
    pub fn bind_action(&mut self, action: impl Into<String>, keys: Vec<KeyCode>) {
        self.action_map.insert(action.into(), keys);
    }

    /// Process a key press event. OS key repeats do not count as new presses.
    pub fn process_key_down(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    /// Process a key release event
    pub fn process_key_up(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    /// Drop every held key, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.keys_down.clear();
    }

    /// Call at end of frame to clear per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Is any key bound to `action` held?
    pub fn is_action_down(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .is_some_and(|keys| keys.iter().any(|k| self.keys_down.contains(k)))
    }

    /// Was any key bound to `action` pressed this frame?
    pub fn is_action_just_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .is_some_and(|keys| keys.iter().any(|k| self.keys_just_pressed.contains(k)))
    }

    /// -1, 0 or 1 depending on which of two opposing actions is held
    pub fn axis(&self, negative: &str, positive: &str) -> f32 {
        let mut value = 0.0;
        if self.is_action_down(negative) {
            value -= 1.0;
        }
        if self.is_action_down(positive) {
            value += 1.0;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_transitions() {
        let mut input = InputState::new();

        input.process_key_down(KeyCode::KeyW);
        assert!(input.is_key_down(KeyCode::KeyW));
        assert!(input.is_key_just_pressed(KeyCode::KeyW));

        // End frame clears just_pressed
        input.end_frame();
        assert!(input.is_key_down(KeyCode::KeyW));
        assert!(!input.is_key_just_pressed(KeyCode::KeyW));

        // A repeat while held is not a new press
        input.process_key_down(KeyCode::KeyW);
        assert!(!input.is_key_just_pressed(KeyCode::KeyW));

        input.process_key_up(KeyCode::KeyW);
        assert!(!input.is_key_down(KeyCode::KeyW));
    }

    #[test]
    fn test_action_binding() {
        let mut input = InputState::new();
        input.bind_action("toggle_light", vec![KeyCode::KeyP]);
        assert!(!input.is_action_down("toggle_light"));

        input.process_key_down(KeyCode::KeyP);
        assert!(input.is_action_down("toggle_light"));
        assert!(input.is_action_just_pressed("toggle_light"));

        input.end_frame();
        assert!(input.is_action_down("toggle_light"));
        assert!(!input.is_action_just_pressed("toggle_light"));
        assert!(!input.is_action_down("unbound"));
    }

    #[test]
    fn test_axis() {
        let mut input = InputState::new();
        input.bind_action("left", vec![KeyCode::KeyA]);
        input.bind_action("right", vec![KeyCode::KeyD]);
        assert_eq!(input.axis("left", "right"), 0.0);

        input.process_key_down(KeyCode::KeyD);
        assert_eq!(input.axis("left", "right"), 1.0);

        input.process_key_down(KeyCode::KeyA);
        assert_eq!(input.axis("left", "right"), 0.0);

        input.process_key_up(KeyCode::KeyD);
        assert_eq!(input.axis("left", "right"), -1.0);
    }

    #[test]
    fn test_release_all() {
        let mut input = InputState::new();
        input.process_key_down(KeyCode::KeyE);
        input.process_key_down(KeyCode::KeyQ);
        input.release_all();
        assert!(!input.is_key_down(KeyCode::KeyE));
        assert!(!input.is_key_down(KeyCode::KeyQ));
    }
}
