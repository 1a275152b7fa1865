//! The stopwatch controller: one owned value holding the timing state
//! machine, the input channels, the current scramble and the session
//! registry. Every inbound call runs to completion and reports what the
//! presentation layer should refresh as a list of notifications.

use crate::config::Config;
use crate::gesture::{Gesture, KeyChannel, PointerChannel};
use crate::record::{AttemptRecord, Annotation};
use crate::scramble::ScrambleSource;
use crate::session::SessionRegistry;
use crate::stats::SessionStats;
use crate::store::KvStore;
use crate::timer::{Phase, TimerEvent, TimerMachine};
use crossterm::event::{KeyEvent, MouseEvent};
use log::info;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// The ready affordance turned on
    Armed,
    /// A hold ended below the threshold; ready affordance off
    Disarmed,
    AttemptStarted,
    AttemptFinished(AttemptRecord),
    /// The running display schedule was cancelled
    DisplayStopped,
    ScrambleChanged,
    RecordListChanged,
    SessionListChanged,
}

#[derive(Debug)]
pub struct Stopwatch<S: KvStore, G: ScrambleSource> {
    machine: TimerMachine,
    keys: KeyChannel,
    pointer: PointerChannel,
    registry: SessionRegistry<S>,
    scrambler: G,
    scramble: String,
}

impl<S: KvStore, G: ScrambleSource> Stopwatch<S, G> {
    pub fn new(config: &Config, store: S, mut scrambler: G) -> Self {
        let scramble = scrambler.next_scramble();
        Self {
            machine: TimerMachine::new(config.hold_threshold(), config.display_interval()),
            keys: KeyChannel::new(),
            pointer: PointerChannel::new(),
            registry: SessionRegistry::new(store, config.penalty_policy),
            scrambler,
            scramble,
        }
    }

    /// Single-event key handling for terminals that never report a release
    pub fn set_tap_mode(&mut self, tap: bool) {
        self.keys = if tap {
            KeyChannel::tap(self.machine.hold_threshold())
        } else {
            KeyChannel::new()
        };
    }

    pub fn is_tap_mode(&self) -> bool {
        self.keys.is_tap_mode()
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn is_ready(&self) -> bool {
        self.machine.is_ready()
    }

    pub fn machine(&self) -> &TimerMachine {
        &self.machine
    }

    pub fn key_channel(&self) -> &KeyChannel {
        &self.keys
    }

    pub fn pointer_channel(&self) -> &PointerChannel {
        &self.pointer
    }

    /// Value for the running display, `None` once the schedule is cancelled
    pub fn display_elapsed(&self, now: Instant) -> Option<Duration> {
        self.machine.display().map(|ticker| ticker.sample(now))
    }

    pub fn display_interval(&self) -> Option<Duration> {
        self.machine.display().map(|ticker| ticker.interval())
    }

    pub fn scramble(&self) -> &str {
        &self.scramble
    }

    pub fn records(&self) -> &[AttemptRecord] {
        self.registry.records()
    }

    pub fn sessions(&self) -> Vec<String> {
        self.registry.list()
    }

    pub fn active_session(&self) -> &str {
        self.registry.active()
    }

    pub fn registry(&self) -> &SessionRegistry<S> {
        &self.registry
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::from_records(self.registry.records())
    }

    pub fn arm_attempt(&mut self, now: Instant) -> Vec<Notification> {
        self.apply(Gesture::Arm { at: now })
    }

    pub fn release_attempt(&mut self, now: Instant, held: Duration) -> Vec<Notification> {
        self.apply(Gesture::Release { at: now, held })
    }

    pub fn on_key_event(&mut self, key: &KeyEvent, now: Instant) -> Vec<Notification> {
        let gestures = self.keys.on_key_event(key, now);
        self.apply_all(gestures)
    }

    pub fn on_mouse_event(&mut self, mouse: &MouseEvent, now: Instant) -> Vec<Notification> {
        let gestures = self.pointer.on_mouse_event(mouse, now);
        self.apply_all(gestures)
    }

    fn apply_all(&mut self, gestures: Vec<Gesture>) -> Vec<Notification> {
        gestures
            .into_iter()
            .flat_map(|gesture| self.apply(gesture))
            .collect()
    }

    pub fn apply(&mut self, gesture: Gesture) -> Vec<Notification> {
        match self.machine.handle(gesture) {
            None => Vec::new(),
            Some(TimerEvent::Armed) => vec![Notification::Armed],
            Some(TimerEvent::Cancelled { .. }) => vec![Notification::Disarmed],
            Some(TimerEvent::Started) => vec![Notification::AttemptStarted],
            Some(TimerEvent::Finished { elapsed }) => self.finish(elapsed),
        }
    }

    fn finish(&mut self, elapsed: Duration) -> Vec<Notification> {
        let record = AttemptRecord::finished(elapsed, self.scramble.clone());
        info!(
            "Attempt finished in {}s for session {}",
            record.time,
            self.registry.active()
        );
        self.registry.append(record.clone());
        self.scramble = self.scrambler.next_scramble();

        vec![
            Notification::DisplayStopped,
            Notification::AttemptFinished(record),
            Notification::RecordListChanged,
            Notification::ScrambleChanged,
        ]
    }

    pub fn annotate(&mut self, index: usize, annotation: Annotation) -> Vec<Notification> {
        if self.registry.annotate(index, annotation) {
            vec![Notification::RecordListChanged]
        } else {
            Vec::new()
        }
    }

    pub fn create_session(&mut self, name: &str) -> Vec<Notification> {
        if self.registry.create(name) {
            vec![Notification::SessionListChanged]
        } else {
            Vec::new()
        }
    }

    pub fn switch_session(&mut self, name: &str) -> Vec<Notification> {
        if self.registry.switch_active(name) {
            vec![
                Notification::SessionListChanged,
                Notification::RecordListChanged,
            ]
        } else {
            Vec::new()
        }
    }

    pub fn delete_session(&mut self, name: &str) -> Vec<Notification> {
        if self.registry.delete(name) {
            vec![
                Notification::SessionListChanged,
                Notification::RecordListChanged,
            ]
        } else {
            vec![Notification::SessionListChanged]
        }
    }
}
