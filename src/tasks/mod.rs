//! Background tasks module
//!
//! This module contains the tasks that drive timers from the tokio runtime.

pub mod edit_input;
pub mod ticker;

// Re-export main functions
pub use edit_input::edit_input_task;
pub use ticker::ticker_task;
