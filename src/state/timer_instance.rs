//! Per-timer run state and the tick state machine
//!
//! `TimerInstance` holds no clock or scheduler. Callers pass the current time
//! in and act on what each transition hands back (a schedule to cancel, a
//! string to display, whether to invoke the callback).

use tracing::{debug, info};

use crate::{convert::render, error::TimerError, services::ScheduleHandle};

use super::{CallbackPolicy, TimerConfig, TimerSnapshot, TimerState};

/// What a single tick produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// Text to hand to the render sink
    pub display: String,
    /// The tick landed on a firing boundary
    pub boundary: bool,
    /// The callback must be invoked
    pub invoke_callback: bool,
    /// The tick stopped the timer
    pub stopped: bool,
    /// Schedule to cancel as a result of stopping
    pub cancel: Option<ScheduleHandle>,
}

/// Mutable state of one timer
#[derive(Debug, Clone)]
pub struct TimerInstance {
    /// `duration` is cleared by the engine after a one-shot boundary
    pub config: TimerConfig,
    /// Unix seconds the elapsed count is measured from
    pub start_time: i64,
    pub total_seconds: u64,
    pub state: TimerState,
    pub schedule: Option<ScheduleHandle>,
    /// Last rendered text
    pub display: String,
    /// Elapsed second of the most recent firing boundary
    pub last_boundary: Option<u64>,
    /// Countdown length, kept after a one-shot duration is cleared
    pub countdown_from: Option<u64>,
}

impl TimerInstance {
    /// Create a running instance whose elapsed count starts at `config.seconds`
    pub fn new(config: TimerConfig, now: i64) -> Result<Self, TimerError> {
        config.validate()?;

        let total_seconds = config.seconds;
        let mut instance = Self {
            start_time: now.saturating_sub(seconds_as_i64(total_seconds)),
            total_seconds,
            state: TimerState::Running,
            schedule: None,
            display: String::new(),
            last_boundary: None,
            countdown_from: config.duration.filter(|_| config.countdown),
            config,
        };
        instance.display = instance.render_current();

        info!("Timer created at {}s ({})", total_seconds, instance.display);
        Ok(instance)
    }

    /// RUNNING -> PAUSED. Returns the schedule to cancel, `None` when not running.
    pub fn pause(&mut self) -> Option<ScheduleHandle> {
        if self.state != TimerState::Running {
            debug!("Pause ignored while {}", self.state);
            return None;
        }
        self.state = TimerState::Paused;
        info!("Timer paused at {}s", self.total_seconds);
        self.schedule.take()
    }

    /// PAUSED -> RUNNING, continuing from the frozen count.
    ///
    /// Returns whether the caller must reschedule ticks.
    pub fn resume(&mut self, now: i64) -> bool {
        if self.state != TimerState::Paused {
            debug!("Resume ignored while {}", self.state);
            return false;
        }
        self.start_time = now.saturating_sub(seconds_as_i64(self.total_seconds));
        self.state = TimerState::Running;
        info!("Timer resumed from {}s", self.total_seconds);
        true
    }

    /// Resume with the elapsed count overridden, as after a user edit
    pub fn resume_from(&mut self, total_seconds: u64, now: i64) -> bool {
        if self.state != TimerState::Paused {
            debug!("Resume ignored while {}", self.state);
            return false;
        }
        self.total_seconds = total_seconds;
        self.last_boundary = None;
        self.display = self.render_current();
        self.resume(now)
    }

    /// RUNNING or PAUSED -> STOPPED. Returns the schedule to cancel.
    pub fn stop(&mut self) -> Option<ScheduleHandle> {
        if self.state == TimerState::Stopped {
            return None;
        }
        self.state = TimerState::Stopped;
        info!("Timer stopped at {}s", self.total_seconds);
        self.schedule.take()
    }

    /// Advance the timer to `now`. Ticks outside RUNNING yield `None`.
    pub fn on_tick(&mut self, now: i64) -> Option<TickOutcome> {
        if self.state != TimerState::Running {
            return None;
        }

        self.total_seconds = u64::try_from(now.saturating_sub(self.start_time)).unwrap_or(0);
        self.display = self.render_current();
        debug!("Tick at {}s: {}", self.total_seconds, self.display);

        let mut outcome = TickOutcome {
            display: self.display.clone(),
            boundary: false,
            invoke_callback: false,
            stopped: false,
            cancel: None,
        };

        // Untimed: render only
        let Some(duration) = self.config.duration else {
            return Some(outcome);
        };

        // Several ticks can land in the same boundary second; only the first fires
        outcome.boundary = is_firing_boundary(self.total_seconds, duration)
            && self.last_boundary != Some(self.total_seconds);
        if outcome.boundary {
            self.last_boundary = Some(self.total_seconds);
            info!("Duration of {}s completed at {}s", duration, self.total_seconds);
            if !self.config.repeat {
                self.config.duration = None;
                debug!("One-shot duration cleared");
            }
            if self.config.countdown && !self.config.restart {
                outcome.cancel = self.stop();
                outcome.stopped = true;
            }
        }

        // With `EveryTick` the callback runs on every timed tick, not only on
        // boundaries.
        outcome.invoke_callback = match self.config.fire_on {
            CallbackPolicy::EveryTick => true,
            CallbackPolicy::Boundary => outcome.boundary,
        };

        Some(outcome)
    }

    /// Value shown to the user: remaining time in countdown mode, elapsed otherwise.
    ///
    /// A countdown whose one-shot duration has completed stays at 0.
    pub fn display_seconds(&self) -> u64 {
        match (self.config.duration, self.countdown_from) {
            (Some(duration), Some(_)) if duration > 0 => {
                countdown_remaining(self.total_seconds, duration)
            }
            (None, Some(from)) => from.saturating_sub(self.total_seconds),
            _ => self.total_seconds,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(
            self.state,
            self.total_seconds,
            self.display.clone(),
            self.config.duration,
        )
    }

    fn render_current(&self) -> String {
        render(self.display_seconds(), self.config.format.as_deref())
    }
}

/// A tick is a firing boundary when a non-zero elapsed count is an exact
/// multiple of `duration`. A zero duration never fires.
pub fn is_firing_boundary(total_seconds: u64, duration: u64) -> bool {
    total_seconds > 0 && total_seconds.checked_rem(duration) == Some(0)
}

/// Seconds left in the current `duration` cycle, reaching 0 on each boundary
fn countdown_remaining(total_seconds: u64, duration: u64) -> u64 {
    if total_seconds == 0 {
        return duration;
    }
    duration - ((total_seconds - 1) % duration + 1)
}

fn seconds_as_i64(seconds: u64) -> i64 {
    i64::try_from(seconds).unwrap_or(i64::MAX)
}
