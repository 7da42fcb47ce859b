//! Time conversion module
//!
//! Pure functions between raw second counts, structured time and the
//! pretty, templated and duration string forms.

pub mod parse;
pub mod render;
pub mod structured;

// Re-export main functions
pub use parse::{parse_duration, parse_pretty_string};
pub use render::{render, to_formatted_string, to_pretty_string};
pub use structured::{to_structured, StructuredTime};
