//! External collaborators module
//!
//! This module contains the clock, scheduler and render sink the timer
//! engine runs against.

pub mod clock;
pub mod render_sink;
pub mod scheduler;

// Re-export main types
pub use clock::*;
pub use render_sink::*;
pub use scheduler::*;
