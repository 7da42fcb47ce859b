//! State management module
//!
//! This module contains the timer configuration, run state and the tick
//! state machine.

pub mod timer_config;
pub mod timer_instance;
pub mod timer_state;

// Re-export main types
pub use timer_config::{Callback, CallbackPolicy, TimerConfig, DEFAULT_UPDATE_FREQUENCY_MS};
pub use timer_instance::{is_firing_boundary, TickOutcome, TimerInstance};
pub use timer_state::{TimerSnapshot, TimerState};
