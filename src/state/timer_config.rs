//! Timer configuration

use std::{fmt, sync::Arc};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::TimerError;

/// Default display refresh period in milliseconds
pub const DEFAULT_UPDATE_FREQUENCY_MS: u64 = 500;

/// User callback invoked by the tick handler
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn() + Send + Sync>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl Default for Callback {
    fn default() -> Self {
        Self::new(|| info!("Time up!"))
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// Which ticks invoke the callback once a duration is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CallbackPolicy {
    /// Every tick while a duration is set, boundary or not
    #[default]
    EveryTick,
    /// Only ticks that land on a firing boundary
    Boundary,
}

/// Options a timer is created with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimerConfig {
    /// Seconds the timer starts from
    pub seconds: u64,
    /// Allow the displayed time to be edited by the user
    pub editable: bool,
    /// Keep a countdown running after its duration completes
    pub restart: bool,
    /// Seconds between firing boundaries
    pub duration: Option<u64>,
    /// Keep `duration` after the first boundary
    pub repeat: bool,
    /// Count down to zero and stop at the first boundary
    pub countdown: bool,
    /// Custom render template, pretty time when absent
    pub format: Option<String>,
    /// Tick period in milliseconds
    pub update_frequency: u64,
    /// Which timed ticks invoke the callback
    pub fire_on: CallbackPolicy,
    #[serde(skip)]
    pub callback: Callback,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            seconds: 0,
            editable: false,
            restart: false,
            duration: None,
            repeat: false,
            countdown: false,
            format: None,
            update_frequency: DEFAULT_UPDATE_FREQUENCY_MS,
            fire_on: CallbackPolicy::default(),
            callback: Callback::default(),
        }
    }
}

impl TimerConfig {
    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<(), TimerError> {
        if self.duration == Some(0) {
            return Err(TimerError::InvalidConfig(
                "duration must be a positive number of seconds".to_string(),
            ));
        }
        if self.update_frequency == 0 {
            return Err(TimerError::InvalidConfig(
                "update frequency must be a positive number of milliseconds".to_string(),
            ));
        }
        Ok(())
    }

    /// Replace the callback
    pub fn with_callback<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callback = Callback::new(f);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_defaults() {
        let config = TimerConfig::default();
        assert_eq!(config.seconds, 0);
        assert_eq!(config.duration, None);
        assert_eq!(config.update_frequency, 500);
        assert_eq!(config.fire_on, CallbackPolicy::EveryTick);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let config = TimerConfig { duration: Some(0), ..Default::default() };
        assert!(matches!(config.validate(), Err(TimerError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_zero_frequency() {
        let config = TimerConfig { update_frequency: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(TimerError::InvalidConfig(_))));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: TimerConfig =
            serde_json::from_str(r#"{"duration": 30, "countdown": true, "fireOn": "boundary"}"#).unwrap();
        assert_eq!(config.duration, Some(30));
        assert!(config.countdown);
        assert_eq!(config.fire_on, CallbackPolicy::Boundary);
        assert_eq!(config.update_frequency, 500);
    }

    #[test]
    fn test_with_callback() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let config = TimerConfig::default().with_callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        config.callback.call();
        config.clone().callback.call();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
