//! Input management system
//!
//! Translates raw [`PlatformEvent`]s into a per-frame snapshot of
//! pressed/held/released keys and mouse state. The engine calls
//! [`Input::update`] once at the start of every frame before feeding that
//! frame's events through [`Input::process_event`].

use crate::foundation::math::{utils, Vec2};
use crate::platform::{PlatformEvent, WindowEvent};
use std::collections::HashSet;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Anything that can be pressed: a keyboard key or a mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputKey {
    /// Keyboard key
    Key(KeyCode),
    /// Mouse button
    Mouse(MouseButton),
}

impl From<KeyCode> for InputKey {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

impl From<MouseButton> for InputKey {
    fn from(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Queryable key states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Went down this frame
    Pressed,
    /// Currently down
    Held,
    /// Went up this frame
    Released,
}

/// Per-frame input snapshot
#[derive(Debug, Clone, Default)]
pub struct Input {
    current_keys: HashSet<InputKey>,
    previous_keys: HashSet<InputKey>,
    pressed_this_frame: HashSet<InputKey>,
    released_this_frame: HashSet<InputKey>,

    mouse_position: Vec2,
    previous_mouse_position: Vec2,
    mouse_delta: Vec2,
    mouse_wheel: Vec2,
    window_events: Vec<WindowEvent>,
    quit_requested: bool,
}

impl Input {
    /// Create an empty input snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame
    ///
    /// Clears the per-frame pressed/released sets, wheel and window events,
    /// and computes the mouse delta over the previous frame.
    pub fn update(&mut self) {
        self.pressed_this_frame.clear();
        self.released_this_frame.clear();

        self.mouse_delta = self.mouse_position - self.previous_mouse_position;
        self.previous_mouse_position = self.mouse_position;
        self.mouse_wheel = Vec2::zeros();
        self.window_events.clear();
        self.quit_requested = false;

        self.previous_keys.clone_from(&self.current_keys);
    }

    /// Fold one platform event into the snapshot
    pub fn process_event(&mut self, event: &PlatformEvent) {
        match *event {
            PlatformEvent::Quit => self.quit_requested = true,
            PlatformEvent::Key { key, pressed } => self.set_key(key.into(), pressed),
            PlatformEvent::MouseButton { button, pressed } => self.set_key(button.into(), pressed),
            PlatformEvent::MouseMotion { x, y } => self.mouse_position = Vec2::new(x, y),
            PlatformEvent::MouseWheel { x, y } => self.mouse_wheel += Vec2::new(x, y),
            PlatformEvent::Window(window_event) => self.window_events.push(window_event),
        }
    }

    fn set_key(&mut self, key: InputKey, pressed: bool) {
        if pressed {
            // OS key repeat arrives as extra "down" events; only the first counts
            if self.current_keys.insert(key) {
                self.pressed_this_frame.insert(key);
            }
        } else {
            self.released_this_frame.insert(key);
            self.current_keys.remove(&key);
        }
    }

    /// Did the key go down this frame?
    pub fn is_pressed(&self, key: impl Into<InputKey>) -> bool {
        self.pressed_this_frame.contains(&key.into())
    }

    /// Is the key currently down?
    pub fn is_held(&self, key: impl Into<InputKey>) -> bool {
        self.current_keys.contains(&key.into())
    }

    /// Did the key go up this frame?
    pub fn is_released(&self, key: impl Into<InputKey>) -> bool {
        self.released_this_frame.contains(&key.into())
    }

    /// Query a key by state
    pub fn is_key(&self, key: impl Into<InputKey>, state: KeyState) -> bool {
        let key = key.into();
        match state {
            KeyState::Pressed => self.is_pressed(key),
            KeyState::Held => self.is_held(key),
            KeyState::Released => self.is_released(key),
        }
    }

    /// Was the key down at the end of the previous frame?
    pub fn was_held(&self, key: impl Into<InputKey>) -> bool {
        self.previous_keys.contains(&key.into())
    }

    /// Normalized WASD movement, Y pointing down the screen
    pub fn movement_wasd(&self) -> Vec2 {
        self.movement_from(KeyCode::W, KeyCode::S, KeyCode::A, KeyCode::D)
    }

    /// Normalized arrow-key movement, Y pointing down the screen
    pub fn movement_arrows(&self) -> Vec2 {
        self.movement_from(KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right)
    }

    fn movement_from(&self, up: KeyCode, down: KeyCode, left: KeyCode, right: KeyCode) -> Vec2 {
        let mut movement = Vec2::zeros();
        if self.is_held(up) {
            movement.y -= 1.0;
        }
        if self.is_held(down) {
            movement.y += 1.0;
        }
        if self.is_held(left) {
            movement.x -= 1.0;
        }
        if self.is_held(right) {
            movement.x += 1.0;
        }

        // Diagonals must not be faster than straight lines
        utils::normalize_or_zero(movement)
    }

    /// Mouse position in window pixels
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Mouse movement over the previous frame
    pub fn mouse_movement(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Wheel scroll accumulated this frame
    pub fn mouse_wheel(&self) -> Vec2 {
        self.mouse_wheel
    }

    /// Window events received this frame
    pub fn window_events(&self) -> &[WindowEvent] {
        &self.window_events
    }

    /// Did a quit event arrive this frame?
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn key(key: KeyCode, pressed: bool) -> PlatformEvent {
        PlatformEvent::Key { key, pressed }
    }

    #[test]
    fn test_key_transitions() {
        let mut input = Input::new();

        input.update();
        input.process_event(&key(KeyCode::W, true));
        assert!(input.is_pressed(KeyCode::W));
        assert!(input.is_held(KeyCode::W));
        assert!(!input.is_released(KeyCode::W));

        input.update();
        assert!(!input.is_pressed(KeyCode::W));
        assert!(input.is_held(KeyCode::W));
        assert!(input.was_held(KeyCode::W));

        input.update();
        input.process_event(&key(KeyCode::W, false));
        assert!(input.is_released(KeyCode::W));
        assert!(!input.is_held(KeyCode::W));
        assert!(input.is_key(KeyCode::W, KeyState::Released));
    }

    #[test]
    fn test_key_repeat_is_not_a_new_press() {
        let mut input = Input::new();
        input.process_event(&key(KeyCode::Space, true));
        input.update();
        input.process_event(&key(KeyCode::Space, true));
        assert!(!input.is_pressed(KeyCode::Space));
        assert!(input.is_held(KeyCode::Space));
    }

    #[test]
    fn test_mouse_buttons_share_key_model() {
        let mut input = Input::new();
        input.process_event(&PlatformEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert!(input.is_pressed(MouseButton::Left));
        assert!(input.is_held(InputKey::Mouse(MouseButton::Left)));
        assert!(!input.is_held(MouseButton::Right));
    }

    #[test]
    fn test_mouse_delta_and_wheel() {
        let mut input = Input::new();
        input.process_event(&PlatformEvent::MouseMotion { x: 100.0, y: 50.0 });
        input.process_event(&PlatformEvent::MouseWheel { x: 0.0, y: 1.0 });
        input.process_event(&PlatformEvent::MouseWheel { x: 0.0, y: 0.5 });
        assert_eq!(input.mouse_wheel(), Vec2::new(0.0, 1.5));

        input.update();
        assert_eq!(input.mouse_movement(), Vec2::new(100.0, 50.0));
        assert_eq!(input.mouse_wheel(), Vec2::zeros());

        input.update();
        assert_eq!(input.mouse_movement(), Vec2::zeros());
        assert_eq!(input.mouse_position(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_movement_is_normalized() {
        let mut input = Input::new();
        input.process_event(&key(KeyCode::W, true));
        input.process_event(&key(KeyCode::D, true));
        let movement = input.movement_wasd();
        assert_relative_eq!(movement.norm(), 1.0, epsilon = 1e-6);
        assert!(movement.x > 0.0 && movement.y < 0.0);
        assert_eq!(input.movement_arrows(), Vec2::zeros());
    }

    #[test]
    fn test_quit_and_window_events_are_per_frame() {
        let mut input = Input::new();
        input.process_event(&PlatformEvent::Quit);
        input.process_event(&PlatformEvent::Window(WindowEvent::FocusLost));
        assert!(input.quit_requested());
        assert_eq!(input.window_events(), &[WindowEvent::FocusLost]);

        input.update();
        assert!(!input.quit_requested());
        assert!(input.window_events().is_empty());
    }
}
