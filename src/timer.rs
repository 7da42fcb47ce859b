//! Timer engine
//!
//! Wires a `TimerInstance` to its clock, scheduler and render sink, invokes
//! the user callback and publishes snapshots to watchers.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    convert::parse_pretty_string,
    error::TimerError,
    services::{Clock, RenderSink, Scheduler},
    state::{TickOutcome, TimerConfig, TimerInstance, TimerSnapshot, TimerState},
};

/// Collaborators a timer runs against
#[derive(Clone)]
pub struct TimerEnv {
    pub clock: Arc<dyn Clock>,
    pub scheduler: Arc<dyn Scheduler>,
    pub sink: Arc<dyn RenderSink>,
}

impl TimerEnv {
    pub fn new(clock: Arc<dyn Clock>, scheduler: Arc<dyn Scheduler>, sink: Arc<dyn RenderSink>) -> Self {
        Self { clock, scheduler, sink }
    }
}

struct TimerInner {
    instance: Mutex<TimerInstance>,
    env: TimerEnv,
    /// Outward mirror of the run state, never read back
    update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _update_rx: watch::Receiver<TimerSnapshot>,
}

/// Handle to a running timer. Clones share the same timer.
#[derive(Clone)]
pub struct Timer {
    inner: Arc<TimerInner>,
}

impl Timer {
    /// Create a timer in RUNNING state and schedule its ticks
    pub fn start(config: TimerConfig, env: TimerEnv) -> Result<Self, TimerError> {
        let instance = TimerInstance::new(config, env.clock.now_unix_seconds())?;
        let initial = instance.snapshot();
        let (update_tx, update_rx) = watch::channel(initial.clone());

        let timer = Self {
            inner: Arc::new(TimerInner {
                instance: Mutex::new(instance),
                env,
                update_tx,
                _update_rx: update_rx,
            }),
        };

        timer.inner.env.sink.display(&initial.display);
        {
            let mut instance = timer.inner.lock();
            TimerInner::schedule(&timer.inner, &mut instance);
        }
        Ok(timer)
    }

    /// Advance the timer to the current time.
    ///
    /// This is what the scheduler runs; ticks outside RUNNING do nothing.
    pub fn tick(&self) -> Option<TickOutcome> {
        self.inner.tick()
    }

    /// RUNNING -> PAUSED. Returns false when the timer was not running.
    pub fn pause(&self) -> bool {
        let mut instance = self.inner.lock();
        if instance.state != TimerState::Running {
            debug!("Pause ignored while {}", instance.state);
            return false;
        }
        if let Some(handle) = instance.pause() {
            self.inner.env.scheduler.cancel(handle);
        }
        self.inner.publish(instance.snapshot());
        true
    }

    /// PAUSED -> RUNNING, continuing from the frozen elapsed count
    pub fn resume(&self) -> bool {
        let now = self.inner.env.clock.now_unix_seconds();
        let mut instance = self.inner.lock();
        if !instance.resume(now) {
            return false;
        }
        TimerInner::schedule(&self.inner, &mut instance);
        self.inner.publish(instance.snapshot());
        true
    }

    /// Resume with the elapsed count replaced by `total_seconds`
    pub fn resume_from(&self, total_seconds: u64) -> bool {
        let now = self.inner.env.clock.now_unix_seconds();
        let mut instance = self.inner.lock();
        if !instance.resume_from(total_seconds, now) {
            return false;
        }
        self.inner.env.sink.display(&instance.display);
        TimerInner::schedule(&self.inner, &mut instance);
        self.inner.publish(instance.snapshot());
        true
    }

    /// RUNNING or PAUSED -> STOPPED. Terminal.
    pub fn stop(&self) -> bool {
        let mut instance = self.inner.lock();
        if instance.state == TimerState::Stopped {
            return false;
        }
        if let Some(handle) = instance.stop() {
            self.inner.env.scheduler.cancel(handle);
        }
        self.inner.publish(instance.snapshot());
        true
    }

    /// The display surface gained focus. Pauses editable timers.
    pub fn on_focus(&self) -> bool {
        if !self.is_editable() {
            debug!("Focus ignored on a non-editable timer");
            return false;
        }
        self.pause()
    }

    /// The display surface lost focus showing `text`.
    ///
    /// Editable timers resume from the parsed pretty time. When `text` does not
    /// parse the error is returned and the timer stays paused.
    pub fn on_blur(&self, text: &str) -> Result<bool, TimerError> {
        if !self.is_editable() {
            debug!("Blur ignored on a non-editable timer");
            return Ok(false);
        }
        let total_seconds = parse_pretty_string(text).inspect_err(|e| {
            warn!("Rejected edited time {:?}: {}", text, e);
        })?;
        Ok(self.resume_from(total_seconds))
    }

    pub fn state(&self) -> TimerState {
        self.inner.lock().state
    }

    pub fn total_seconds(&self) -> u64 {
        self.inner.lock().total_seconds
    }

    /// Last rendered text
    pub fn display_text(&self) -> String {
        self.inner.lock().display.clone()
    }

    /// Current configuration, including any duration cleared by a one-shot
    pub fn config(&self) -> TimerConfig {
        self.inner.lock().config.clone()
    }

    pub fn is_editable(&self) -> bool {
        self.inner.lock().config.editable
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.inner.lock().snapshot()
    }

    /// Watch snapshots published after every transition and tick
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.inner.update_tx.subscribe()
    }

    /// Resolve once the timer reaches STOPPED
    pub async fn stopped(&self) {
        let mut rx = self.subscribe();
        if rx.wait_for(|snapshot| snapshot.is_stopped()).await.is_err() {
            warn!("Timer update channel closed before the timer stopped");
        }
    }
}

impl TimerInner {
    fn lock(&self) -> MutexGuard<'_, TimerInstance> {
        self.instance.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedule repeating ticks for a RUNNING instance. Called with the lock held
    /// so no tick can observe the instance before its handle is stored.
    fn schedule(this: &Arc<Self>, instance: &mut TimerInstance) {
        let period = Duration::from_millis(instance.config.update_frequency);
        let weak: Weak<Self> = Arc::downgrade(this);
        let handle = this.env.scheduler.schedule_repeating(
            period,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.tick();
                }
            }),
        );
        instance.schedule = Some(handle);
    }

    fn tick(&self) -> Option<TickOutcome> {
        let now = self.env.clock.now_unix_seconds();
        let (outcome, callback, snapshot) = {
            let mut instance = self.lock();
            let outcome = instance.on_tick(now)?;
            (outcome, instance.config.callback.clone(), instance.snapshot())
        };

        self.env.sink.display(&outcome.display);
        if let Some(handle) = outcome.cancel {
            self.env.scheduler.cancel(handle);
        }
        self.publish(snapshot);

        // Outside the lock so the callback may drive the timer
        if outcome.invoke_callback {
            callback.call();
        }
        Some(outcome)
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
    }
}

impl Drop for TimerInner {
    fn drop(&mut self) {
        let instance = self.instance.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = instance.schedule.take() {
            self.env.scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ManualClock, ManualScheduler, MemorySink};

    #[tokio::test(start_paused = true)]
    async fn test_runs_on_tokio_scheduler() {
        use crate::services::TokioScheduler;

        let clock = Arc::new(ManualClock::new(0));
        let sink = Arc::new(MemorySink::new());
        let scheduler = Arc::new(TokioScheduler::current().unwrap());
        let env = TimerEnv::new(clock.clone(), scheduler.clone(), sink.clone());

        let timer = Timer::start(
            TimerConfig { duration: Some(2), countdown: true, update_frequency: 1_000, ..Default::default() },
            env,
        )
        .unwrap();

        let driver_clock = Arc::clone(&clock);
        let driver = tokio::spawn(async move {
            for _ in 0..4 {
                tokio::time::sleep(Duration::from_millis(900)).await;
                driver_clock.advance(1);
            }
        });

        timer.stopped().await;
        driver.await.unwrap();

        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(scheduler.active(), 0);
        assert_eq!(sink.last().as_deref(), Some("0 sec"));
    }

    #[test]
    fn test_drop_cancels_schedule() {
        let scheduler = Arc::new(ManualScheduler::new());
        let env = TimerEnv::new(
            Arc::new(ManualClock::new(0)),
            scheduler.clone(),
            Arc::new(MemorySink::new()),
        );
        let timer = Timer::start(TimerConfig::default(), env).unwrap();
        assert_eq!(scheduler.pending(), 1);

        drop(timer);
        assert_eq!(scheduler.pending(), 0);
    }
}
