//! Event plumbing between the terminal and the stopwatch loop.

use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, MouseEvent};

/// What the stopwatch loop reacts to
#[derive(Clone, Debug)]
pub enum TimerInput {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    /// Nothing arrived within the wait; redraw if a display is live
    Tick,
}

impl TimerInput {
    /// Terminal events the loop cares about; focus and paste are dropped
    pub fn from_event(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) => Some(Self::Key(key)),
            Event::Mouse(mouse) => Some(Self::Mouse(mouse)),
            Event::Resize(_, _) => Some(Self::Resize),
            _ => None,
        }
    }
}

pub trait InputSource: Send + 'static {
    /// Next input, or `None` when `wait` elapses first
    fn next_within(&self, wait: Duration) -> Option<TimerInput>;
}

/// Reads crossterm events on a background thread
pub struct CrosstermInputSource {
    rx: Receiver<TimerInput>,
}

impl CrosstermInputSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let event = match event::read() {
                Ok(event) => event,
                Err(e) => {
                    log::warn!("Terminal input closed: {e}");
                    break;
                }
            };
            if let Some(input) = TimerInput::from_event(event) {
                if tx.send(input).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermInputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for CrosstermInputSource {
    fn next_within(&self, wait: Duration) -> Option<TimerInput> {
        self.rx.recv_timeout(wait).ok()
    }
}

/// Inputs pushed through a channel; drives the loop in tests
pub struct ChannelInputSource {
    rx: Receiver<TimerInput>,
}

impl ChannelInputSource {
    pub fn new(rx: Receiver<TimerInput>) -> Self {
        Self { rx }
    }
}

impl InputSource for ChannelInputSource {
    fn next_within(&self, wait: Duration) -> Option<TimerInput> {
        self.rx.recv_timeout(wait).ok()
    }
}

/// Pulls one input at a time. Waits `idle_tick` between redraws while
/// nothing is timing and the display interval while an attempt runs.
pub struct Runner<E: InputSource> {
    source: E,
    idle_tick: Duration,
}

impl<E: InputSource> Runner<E> {
    pub fn new(source: E, idle_tick: Duration) -> Self {
        Self { source, idle_tick }
    }

    pub fn idle_tick(&self) -> Duration {
        self.idle_tick
    }

    pub fn step(&self) -> TimerInput {
        self.step_for(None)
    }

    /// `display` is the running display interval, if any
    pub fn step_for(&self, display: Option<Duration>) -> TimerInput {
        let wait = display.unwrap_or(self.idle_tick);
        self.source.next_within(wait).unwrap_or(TimerInput::Tick)
    }
}
