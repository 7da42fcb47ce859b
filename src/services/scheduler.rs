//! Repeating tick schedulers

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, PoisonError,
    },
    time::Duration,
};

use tokio::{
    runtime::{Handle, TryCurrentError},
    task::JoinHandle,
};
use tracing::debug;

use crate::tasks::ticker_task;

/// Work run on every tick
pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// Opaque reference to an active repeating schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleHandle(u64);

impl ScheduleHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Runs a tick function on a fixed period until cancelled.
///
/// At most one invocation may be pending per period and none may start
/// after `cancel` returns.
pub trait Scheduler: Send + Sync {
    fn schedule_repeating(&self, period: Duration, tick: TickFn) -> ScheduleHandle;
    fn cancel(&self, handle: ScheduleHandle);
}

/// One tokio task per schedule
#[derive(Debug)]
pub struct TokioScheduler {
    runtime: Handle,
    next_id: AtomicU64,
    tasks: Mutex<HashMap<ScheduleHandle, JoinHandle<()>>>,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Scheduler bound to the runtime of the calling context
    pub fn current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }

    /// Number of schedules not yet cancelled
    pub fn active(&self) -> usize {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, period: Duration, tick: TickFn) -> ScheduleHandle {
        let handle = ScheduleHandle(self.next_id.fetch_add(1, Ordering::SeqCst));
        let task = self.runtime.spawn(ticker_task(period, tick));
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle, task);

        debug!("Scheduled ticks every {:?} as {:?}", period, handle);
        handle
    }

    fn cancel(&self, handle: ScheduleHandle) {
        let task = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle);

        if let Some(task) = task {
            task.abort();
            debug!("Cancelled {:?}", handle);
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, task) in tasks.drain() {
            task.abort();
        }
    }
}

struct ManualEntry {
    period: Duration,
    tick: TickFn,
}

/// Scheduler whose ticks only run when `fire` is called
#[derive(Default)]
pub struct ManualScheduler {
    next_id: AtomicU64,
    schedules: Mutex<BTreeMap<ScheduleHandle, ManualEntry>>,
    cancelled: Mutex<Vec<ScheduleHandle>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every live schedule once, returning how many ran
    pub fn fire(&self) -> usize {
        let handles: Vec<ScheduleHandle> = self.lock_schedules().keys().copied().collect();
        let mut fired = 0;

        for handle in handles {
            // Released while the tick runs so it may cancel itself
            let Some(mut entry) = self.lock_schedules().remove(&handle) else {
                continue;
            };
            (entry.tick)();
            fired += 1;

            if !self.cancelled().contains(&handle) {
                self.lock_schedules().insert(handle, entry);
            }
        }
        fired
    }

    /// Live schedules
    pub fn pending(&self) -> usize {
        self.lock_schedules().len()
    }

    pub fn period(&self, handle: ScheduleHandle) -> Option<Duration> {
        self.lock_schedules().get(&handle).map(|entry| entry.period)
    }

    /// Every handle cancelled so far, in order
    pub fn cancelled(&self) -> Vec<ScheduleHandle> {
        self.cancelled.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn lock_schedules(&self) -> std::sync::MutexGuard<'_, BTreeMap<ScheduleHandle, ManualEntry>> {
        self.schedules.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, period: Duration, tick: TickFn) -> ScheduleHandle {
        let handle = ScheduleHandle(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.lock_schedules().insert(handle, ManualEntry { period, tick });
        handle
    }

    fn cancel(&self, handle: ScheduleHandle) {
        self.lock_schedules().remove(&handle);
        self.cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{atomic::AtomicUsize, Arc};

    fn counter() -> (Arc<AtomicUsize>, TickFn) {
        let hits = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&hits);
        (hits, Box::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_ticks_on_period() {
        let scheduler = TokioScheduler::current().unwrap();
        let (hits, tick) = counter();
        scheduler.schedule_repeating(Duration::from_millis(500), tick);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_cancel_stops_ticks() {
        let scheduler = TokioScheduler::current().unwrap();
        let (hits, tick) = counter();
        let handle = scheduler.schedule_repeating(Duration::from_millis(100), tick);

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        scheduler.cancel(handle);
        assert_eq!(scheduler.active(), 0);
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        // Unknown handles are ignored
        scheduler.cancel(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_independent_schedules() {
        let scheduler = TokioScheduler::current().unwrap();
        let (fast_hits, fast) = counter();
        let (slow_hits, slow) = counter();
        let fast_handle = scheduler.schedule_repeating(Duration::from_millis(100), fast);
        let slow_handle = scheduler.schedule_repeating(Duration::from_millis(300), slow);
        assert_ne!(fast_handle, slow_handle);
        assert_eq!(scheduler.active(), 2);

        tokio::time::sleep(Duration::from_millis(650)).await;
        assert_eq!(fast_hits.load(Ordering::SeqCst), 6);
        assert_eq!(slow_hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_manual_scheduler_fire_and_cancel() {
        let scheduler = ManualScheduler::new();
        let (hits, tick) = counter();
        let handle = scheduler.schedule_repeating(Duration::from_secs(1), tick);
        assert_eq!(scheduler.period(handle), Some(Duration::from_secs(1)));

        assert_eq!(scheduler.fire(), 1);
        assert_eq!(scheduler.fire(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        scheduler.cancel(handle);
        assert_eq!(scheduler.fire(), 0);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.cancelled(), vec![handle]);
    }

    #[test]
    fn test_manual_scheduler_tick_may_cancel_itself() {
        let scheduler = Arc::new(ManualScheduler::new());
        let slot: Arc<Mutex<Option<ScheduleHandle>>> = Arc::new(Mutex::new(None));

        let inner_scheduler = Arc::clone(&scheduler);
        let inner_slot = Arc::clone(&slot);
        let handle = scheduler.schedule_repeating(
            Duration::from_secs(1),
            Box::new(move || {
                if let Some(handle) = *inner_slot.lock().unwrap() {
                    inner_scheduler.cancel(handle);
                }
            }),
        );
        *slot.lock().unwrap() = Some(handle);

        assert_eq!(scheduler.fire(), 1);
        assert_eq!(scheduler.pending(), 0);
    }
}
