use crate::gesture::Gesture;
use log::debug;
use std::time::{Duration, Instant};

/// Minimum hold before a release starts the timer
pub const DEFAULT_HOLD_THRESHOLD_MS: u64 = 150;
/// Display refresh cadence while running
pub const DEFAULT_DISPLAY_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Arming,
    Running,
}

/// Transitions reported by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Idle -> Arming
    Armed,
    /// Arming -> Idle, hold was below the threshold
    Cancelled { held: Duration },
    /// Arming -> Running
    Started,
    /// Running -> Idle
    Finished { elapsed: Duration },
}

/// Recurring display schedule owned by the Running phase.
///
/// The value shown is always sampled as `now - started`, never accumulated
/// from ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTicker {
    started: Instant,
    interval: Duration,
}

impl DisplayTicker {
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn sample(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }
}

/// Arm -> run -> stop timing state machine
#[derive(Debug, Clone)]
pub struct TimerMachine {
    phase: Phase,
    arm_started_at: Option<Instant>,
    run_started_at: Option<Instant>,
    hold_threshold: Duration,
    display_interval: Duration,
    display: Option<DisplayTicker>,
}

impl TimerMachine {
    pub fn new(hold_threshold: Duration, display_interval: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            arm_started_at: None,
            run_started_at: None,
            hold_threshold,
            display_interval,
            display: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The "ready" affordance: input is held but the timer has not started
    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Arming
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn arm_started_at(&self) -> Option<Instant> {
        self.arm_started_at
    }

    pub fn run_started_at(&self) -> Option<Instant> {
        self.run_started_at
    }

    pub fn hold_threshold(&self) -> Duration {
        self.hold_threshold
    }

    pub fn display(&self) -> Option<&DisplayTicker> {
        self.display.as_ref()
    }

    /// Authoritative elapsed time of the running attempt
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.run_started_at
            .map(|start| now.saturating_duration_since(start))
    }

    pub fn handle(&mut self, gesture: Gesture) -> Option<TimerEvent> {
        match gesture {
            Gesture::Arm { at } => self.arm(at),
            Gesture::Release { at, held } => self.release(at, held),
        }
    }

    pub fn arm(&mut self, at: Instant) -> Option<TimerEvent> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Arming;
                self.arm_started_at = Some(at);
                debug!("timer armed");
                Some(TimerEvent::Armed)
            }
            Phase::Arming => None,
            Phase::Running => {
                let elapsed = self.elapsed(at).unwrap_or_default();
                self.phase = Phase::Idle;
                self.arm_started_at = None;
                self.run_started_at = None;
                // the one and only cancellation point of the display schedule
                self.display = None;
                debug!("timer stopped after {:?}", elapsed);
                Some(TimerEvent::Finished { elapsed })
            }
        }
    }

    pub fn release(&mut self, at: Instant, held: Duration) -> Option<TimerEvent> {
        if self.phase != Phase::Arming {
            return None;
        }

        self.arm_started_at = None;
        if held < self.hold_threshold {
            self.phase = Phase::Idle;
            debug!("hold of {:?} below threshold, disarmed", held);
            return Some(TimerEvent::Cancelled { held });
        }

        self.phase = Phase::Running;
        self.run_started_at = Some(at);
        self.display = Some(DisplayTicker {
            started: at,
            interval: self.display_interval,
        });
        debug!("timer started after {:?} hold", held);
        Some(TimerEvent::Started)
    }
}

impl Default for TimerMachine {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_HOLD_THRESHOLD_MS),
            Duration::from_millis(DEFAULT_DISPLAY_INTERVAL_MS),
        )
    }
}
