//! Scripted input for unattended runs
//!
//! Stands in for a player on the headless platform: flies the ship around,
//! fires, toggles the camera mode, zooms, clicks an asteroid into place and
//! finally presses Escape.

use helipad::input::{KeyCode, MouseButton};
use helipad::platform::PlatformEvent;
use std::collections::BTreeMap;

/// Per-frame event lists, ending with Escape on frame `frames`
pub fn scripted_session(frames: u32) -> Vec<Vec<PlatformEvent>> {
    let mut script = SessionBuilder::default();

    script.hold(KeyCode::W, 10, 160);
    script.hold(KeyCode::D, 60, 90);
    script.hold(KeyCode::A, 120, 140);
    script.tap(KeyCode::Space, 30);
    script.tap(KeyCode::Space, 95);

    // Free camera pans up for a while, then back to follow mode
    script.tap(KeyCode::C, 180);
    script.hold(KeyCode::Up, 185, 230);
    script.tap(KeyCode::C, 240);

    script.tap(KeyCode::O, 260);
    script.tap(KeyCode::P, 280);
    script.tap(KeyCode::P, 290);

    script.event(300, PlatformEvent::MouseMotion { x: 900.0, y: 200.0 });
    script.click(MouseButton::Left, 302);

    script.tap(KeyCode::Escape, frames);
    script.build(frames)
}

#[derive(Debug, Default)]
struct SessionBuilder {
    frames: BTreeMap<u32, Vec<PlatformEvent>>,
}

impl SessionBuilder {
    fn event(&mut self, frame: u32, event: PlatformEvent) {
        self.frames.entry(frame).or_default().push(event);
    }

    fn hold(&mut self, key: KeyCode, from: u32, to: u32) {
        self.event(from, PlatformEvent::Key { key, pressed: true });
        self.event(to, PlatformEvent::Key { key, pressed: false });
    }

    fn tap(&mut self, key: KeyCode, frame: u32) {
        self.hold(key, frame, frame + 1);
    }

    fn click(&mut self, button: MouseButton, frame: u32) {
        self.event(frame, PlatformEvent::MouseButton { button, pressed: true });
        self.event(frame + 1, PlatformEvent::MouseButton { button, pressed: false });
    }

    /// Frames `0..=last`; later events are dropped
    fn build(mut self, last: u32) -> Vec<Vec<PlatformEvent>> {
        (0..=last)
            .map(|frame| self.frames.remove(&frame).unwrap_or_default())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ends_with_escape() {
        let frames = scripted_session(50);
        assert_eq!(frames.len(), 51);
        assert_eq!(
            frames[50],
            vec![PlatformEvent::Key {
                key: KeyCode::Escape,
                pressed: true
            }]
        );
        assert!(frames.iter().flatten().all(|event| !matches!(
            event,
            PlatformEvent::Key {
                key: KeyCode::C,
                ..
            }
        )));
    }

    #[test]
    fn test_keys_are_released() {
        let frames = scripted_session(400);
        let presses = frames
            .iter()
            .flatten()
            .filter(|event| matches!(event, PlatformEvent::Key { pressed: true, .. }))
            .count();
        let releases = frames
            .iter()
            .flatten()
            .filter(|event| matches!(event, PlatformEvent::Key { pressed: false, .. }))
            .count();
        // Escape is never released
        assert_eq!(presses, releases + 1);
    }
}
