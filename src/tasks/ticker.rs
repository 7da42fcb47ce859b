//! Repeating tick background task

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::services::TickFn;

/// Run `tick` every `period`, starting one period from now.
///
/// A slow tick delays the following ones instead of letting them bunch up.
pub async fn ticker_task(period: Duration, mut tick: TickFn) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        tick();
    }
}
