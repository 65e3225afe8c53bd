//! Per-frame input handler for terminal environments.
//!
//! Supports terminals that do not emit key release events by using a timeout:
//! a direction counts as held while presses or auto-repeats keep arriving.
//! Events carry the time they were read, so a slow frame does not stretch or
//! shrink a hold.

use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::handle_key_event;
use crate::types::{FrameInput, InputCommand};

// Slightly longer than a typical terminal auto-repeat interval, so a held key
// stays held between repeats but a single tap fades within a couple of frames.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 60;

// Longer than the usual OS delay before auto-repeat starts (250-600 ms). Without
// release events, a Space press this close to the previous one is the same hold.
const DEFAULT_STAGE_REARM_MS: u32 = 750;

#[derive(Debug, Clone, Copy, Default)]
struct KeySlot {
    /// Pressed since the last frame was collected
    pressed: bool,
    last_seen: Option<Instant>,
}

/// Collects key events between frames and hands out one [`FrameInput`] per frame.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Up, down, left, right
    directions: [KeySlot; 4],
    stage_key: Option<Instant>,
    toggle_pending: bool,
    quit: bool,
    key_release_timeout_ms: u32,
    stage_rearm_ms: u32,
}

fn slot_index(command: InputCommand) -> Option<usize> {
    match command {
        InputCommand::ThrustUp => Some(0),
        InputCommand::ThrustDown => Some(1),
        InputCommand::ThrustLeft => Some(2),
        InputCommand::ThrustRight => Some(3),
        InputCommand::ToggleStage | InputCommand::Quit => None,
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            directions: [KeySlot::default(); 4],
            stage_key: None,
            toggle_pending: false,
            quit: false,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            stage_rearm_ms: DEFAULT_STAGE_REARM_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    /// Quiet time after a Space event before another press switches stage again.
    pub fn with_stage_rearm_ms(mut self, rearm_ms: u32) -> Self {
        self.stage_rearm_ms = rearm_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn stage_rearm_ms(&self) -> u32 {
        self.stage_rearm_ms
    }

    fn still_held(&self, last_seen: Option<Instant>, now: Instant) -> bool {
        within(last_seen, now, self.key_release_timeout_ms)
    }

    /// Route a raw key event by its kind, stamped with the current time.
    pub fn handle_event(&mut self, key: KeyEvent) -> Option<InputCommand> {
        self.handle_event_at(key, Instant::now())
    }

    /// Route a key event read at `at`.
    pub fn handle_event_at(&mut self, key: KeyEvent, at: Instant) -> Option<InputCommand> {
        match key.kind {
            KeyEventKind::Release => {
                self.handle_key_release(key);
                None
            }
            KeyEventKind::Press | KeyEventKind::Repeat => self.handle_key_press_at(key, at),
        }
    }

    /// Register a press (or auto-repeat). Returns the command it produced, if any.
    ///
    /// The stage key only fires on a fresh press: repeats and presses that
    /// arrive while the key is still considered held are swallowed.
    pub fn handle_key_press(&mut self, key: KeyEvent) -> Option<InputCommand> {
        self.handle_key_press_at(key, Instant::now())
    }

    fn handle_key_press_at(&mut self, key: KeyEvent, now: Instant) -> Option<InputCommand> {
        let command = handle_key_event(key)?;

        match command {
            InputCommand::Quit => {
                self.quit = true;
                Some(command)
            }
            InputCommand::ToggleStage => {
                let held = within(self.stage_key, now, self.stage_rearm_ms);
                self.stage_key = Some(now);
                if held || key.kind == KeyEventKind::Repeat {
                    None
                } else {
                    self.toggle_pending = true;
                    Some(command)
                }
            }
            _ => {
                let index = slot_index(command)?;
                let slot = &mut self.directions[index];
                slot.pressed = true;
                slot.last_seen = Some(now);
                Some(command)
            }
        }
    }

    /// Register a release. A press earlier in the same frame still counts.
    pub fn handle_key_release(&mut self, key: KeyEvent) {
        match handle_key_event(key) {
            Some(InputCommand::ToggleStage) => self.stage_key = None,
            Some(command) => {
                if let Some(index) = slot_index(command) {
                    self.directions[index].last_seen = None;
                }
            }
            None => {}
        }
    }

    /// Build the input for the frame about to run and start a new one.
    pub fn frame(&mut self) -> FrameInput {
        let now = Instant::now();
        let mut held = [false; 4];
        for (index, flag) in held.iter_mut().enumerate() {
            let slot = self.directions[index];
            let within_timeout = self.still_held(slot.last_seen, now);
            *flag = slot.pressed || within_timeout;

            let slot = &mut self.directions[index];
            slot.pressed = false;
            if !within_timeout {
                slot.last_seen = None;
            }
        }

        if !within(self.stage_key, now, self.stage_rearm_ms) {
            self.stage_key = None;
        }

        FrameInput {
            up: held[0],
            down: held[1],
            left: held[2],
            right: held[3],
            stage_toggle: std::mem::take(&mut self.toggle_pending),
            quit_requested: self.quit,
        }
    }

    /// Forget held keys and pending edges. A quit request survives.
    pub fn reset(&mut self) {
        self.directions = [KeySlot::default(); 4];
        self.stage_key = None;
        self.toggle_pending = false;
    }
}

fn within(last_seen: Option<Instant>, now: Instant, window_ms: u32) -> bool {
    let window = Duration::from_millis(window_ms as u64);
    last_seen.is_some_and(|t| now.saturating_duration_since(t) <= window)
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn repeat(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Repeat)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    fn age(ih: &mut InputHandler, index: usize, ms: u64) {
        ih.directions[index].last_seen = Some(Instant::now() - Duration::from_millis(ms));
    }

    #[test]
    fn test_press_shows_up_in_next_frame() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.handle_event(press(KeyCode::Up)), Some(InputCommand::ThrustUp));
        assert_eq!(ih.handle_event(press(KeyCode::Char('d'))), Some(InputCommand::ThrustRight));

        let frame = ih.frame();
        assert!(frame.up && frame.right);
        assert!(!frame.down && !frame.left);
        assert!(!frame.stage_toggle);
    }

    #[test]
    fn test_auto_release_after_timeout_without_release_events() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);
        ih.handle_event(press(KeyCode::Left));
        assert!(ih.frame().left);

        // Simulate no key-release events by moving the last key time into the past.
        age(&mut ih, 2, 51);
        assert!(!ih.frame().left);
    }

    #[test]
    fn test_held_key_survives_frames_within_timeout() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10_000);
        ih.handle_event(press(KeyCode::Down));
        assert!(ih.frame().down);
        assert!(ih.frame().down);
        ih.handle_event(repeat(KeyCode::Down));
        assert!(ih.frame().down);
    }

    #[test]
    fn test_release_ends_hold_but_keeps_same_frame_tap() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10_000);
        ih.handle_event(press(KeyCode::Up));
        ih.handle_event(release(KeyCode::Up));
        assert!(ih.frame().up, "tap inside one frame still counts once");
        assert!(!ih.frame().up);
    }

    #[test]
    fn test_stage_toggle_is_edge_triggered() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10_000);

        assert_eq!(
            ih.handle_event(press(KeyCode::Char(' '))),
            Some(InputCommand::ToggleStage)
        );
        // Terminal auto-repeat, reported either way.
        assert_eq!(ih.handle_event(repeat(KeyCode::Char(' '))), None);
        assert_eq!(ih.handle_event(press(KeyCode::Char(' '))), None);

        assert!(ih.frame().stage_toggle);
        assert!(!ih.frame().stage_toggle, "edge is consumed by one frame");

        ih.handle_event(release(KeyCode::Char(' ')));
        ih.handle_event(press(KeyCode::Char(' ')));
        assert!(ih.frame().stage_toggle);
    }

    #[test]
    fn test_held_space_without_release_events_toggles_once() {
        let mut ih = InputHandler::new();
        let start = Instant::now();
        let at = |ms: u64| start + Duration::from_millis(ms);

        let mut toggles = 0;
        ih.handle_event_at(press(KeyCode::Char(' ')), at(0));
        toggles += usize::from(ih.frame().stage_toggle);
        // Idle frames while the OS waits to start auto-repeat.
        for _ in 0..9 {
            toggles += usize::from(ih.frame().stage_toggle);
        }
        // Auto-repeat arrives as plain presses every 33 ms.
        for i in 0..10 {
            ih.handle_event_at(press(KeyCode::Char(' ')), at(500 + 33 * i));
            toggles += usize::from(ih.frame().stage_toggle);
        }
        assert_eq!(toggles, 1);
    }

    #[test]
    fn test_stage_key_rearms_after_quiet_gap() {
        let mut ih = InputHandler::new().with_stage_rearm_ms(100);
        let start = Instant::now();
        ih.handle_event_at(press(KeyCode::Char(' ')), start);
        assert!(ih.frame().stage_toggle);

        ih.handle_event_at(press(KeyCode::Char(' ')), start + Duration::from_millis(80));
        assert!(!ih.frame().stage_toggle, "still the same hold");

        ih.handle_event_at(press(KeyCode::Char(' ')), start + Duration::from_millis(300));
        assert!(ih.frame().stage_toggle);
    }

    #[test]
    fn test_stamped_time_decides_hold_not_drain_time() {
        let mut ih = InputHandler::new();
        let long_ago = Instant::now() - Duration::from_millis(5_000);
        ih.handle_event_at(press(KeyCode::Char(' ')), long_ago);
        assert!(ih.frame().stage_toggle);

        // Read a second ago and drained only now: a fresh press, not a repeat.
        let recent = Instant::now() - Duration::from_millis(1_000);
        ih.handle_event_at(press(KeyCode::Char(' ')), recent);
        assert!(ih.frame().stage_toggle);
    }

    #[test]
    fn test_quit_is_sticky() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.handle_event(press(KeyCode::Esc)), Some(InputCommand::Quit));
        assert!(ih.frame().quit_requested);
        ih.reset();
        assert!(ih.frame().quit_requested);
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.handle_event(press(KeyCode::Char('x'))), None);
        assert!(ih.frame().is_idle());
    }

    #[test]
    fn test_reset_clears_held_state() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10_000);
        ih.handle_event(press(KeyCode::Right));
        ih.handle_event(press(KeyCode::Char(' ')));
        ih.reset();
        assert!(ih.frame().is_idle());
    }

    #[test]
    fn test_default_timeouts() {
        let ih = InputHandler::new();
        assert!(ih.key_release_timeout_ms() > 0);
        assert!(ih.stage_rearm_ms() > 600, "must outlast the auto-repeat delay");
    }
}
