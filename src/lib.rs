//! Pretty Timer - a count-up/countdown timer engine
//!
//! This library converts second counts to and from pretty, templated and
//! duration strings, and runs timers that render on a fixed cadence, fire a
//! callback when a duration elapses and can be paused, resumed, edited and
//! stopped.

pub mod config;
pub mod convert;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use convert::{parse_duration, parse_pretty_string, to_formatted_string, to_pretty_string, to_structured};
pub use error::TimerError;
pub use state::{TimerConfig, TimerSnapshot, TimerState};
pub use timer::{Timer, TimerEnv};
pub use utils::signals::shutdown_signal;
