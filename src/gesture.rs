//! Normalizes the two physical start/stop inputs into one gesture stream.
//!
//! The key channel (space bar) and the pointer channel (mouse or touch
//! emulation) each track their own "held" flag and produce the same pair of
//! abstract gestures. Nothing downstream knows which channel fired.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use std::time::{Duration, Instant};

/// Abstract start/stop input consumed by the timing state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// A press began
    Arm { at: Instant },
    /// A press ended after being held for `held`
    Release { at: Instant, held: Duration },
}

/// Space bar channel
#[derive(Debug, Clone)]
pub struct KeyChannel {
    pressed_at: Option<Instant>,
    tap_mode: bool,
    tap_hold: Duration,
}

impl KeyChannel {
    pub fn new() -> Self {
        Self {
            pressed_at: None,
            tap_mode: false,
            tap_hold: Duration::ZERO,
        }
    }

    /// Terminals without release reporting: every press is a complete hold
    /// of `tap_hold`, so one tap arms and starts, the next tap stops.
    pub fn tap(tap_hold: Duration) -> Self {
        Self {
            pressed_at: None,
            tap_mode: true,
            tap_hold,
        }
    }

    pub fn is_tap_mode(&self) -> bool {
        self.tap_mode
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    pub fn press(&mut self, now: Instant) -> Vec<Gesture> {
        if self.tap_mode {
            return vec![
                Gesture::Arm { at: now },
                Gesture::Release {
                    at: now,
                    held: self.tap_hold,
                },
            ];
        }

        // key-repeat
        if self.pressed_at.is_some() {
            return Vec::new();
        }

        self.pressed_at = Some(now);
        vec![Gesture::Arm { at: now }]
    }

    pub fn release(&mut self, now: Instant) -> Vec<Gesture> {
        match self.pressed_at.take() {
            Some(start) => vec![Gesture::Release {
                at: now,
                held: now.saturating_duration_since(start),
            }],
            None => Vec::new(),
        }
    }

    /// Translate a terminal key event; anything other than the space bar yields nothing.
    pub fn on_key_event(&mut self, key: &KeyEvent, now: Instant) -> Vec<Gesture> {
        if key.code != KeyCode::Char(' ') {
            return Vec::new();
        }

        match key.kind {
            KeyEventKind::Press => self.press(now),
            KeyEventKind::Release => self.release(now),
            KeyEventKind::Repeat => Vec::new(),
        }
    }
}

impl Default for KeyChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Pointer (mouse / touch emulation) channel
#[derive(Debug, Clone, Default)]
pub struct PointerChannel {
    held_at: Option<Instant>,
}

impl PointerChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held_at.is_some()
    }

    pub fn down(&mut self, now: Instant) -> Vec<Gesture> {
        if self.held_at.is_some() {
            return Vec::new();
        }

        self.held_at = Some(now);
        vec![Gesture::Arm { at: now }]
    }

    /// An up without a matching down is ignored.
    pub fn up(&mut self, now: Instant) -> Vec<Gesture> {
        match self.held_at.take() {
            Some(start) => vec![Gesture::Release {
                at: now,
                held: now.saturating_duration_since(start),
            }],
            None => Vec::new(),
        }
    }

    pub fn on_mouse_event(&mut self, mouse: &MouseEvent, now: Instant) -> Vec<Gesture> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.down(now),
            MouseEventKind::Up(MouseButton::Left) => self.up(now),
            _ => Vec::new(),
        }
    }
}
