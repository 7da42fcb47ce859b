//! Timer run state and the snapshot mirrored to observers

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Run state of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Running,
    Paused,
    /// Terminal
    Stopped,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Point-in-time view of a timer, published after every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub total_seconds: u64,
    pub display: String,
    pub duration: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl TimerSnapshot {
    pub fn new(state: TimerState, total_seconds: u64, display: String, duration: Option<u64>) -> Self {
        Self {
            state,
            total_seconds,
            display,
            duration,
            timestamp: Utc::now(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_stopped(&self) -> bool {
        self.state == TimerState::Stopped
    }
}
