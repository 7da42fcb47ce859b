//! Error types for time parsing and timer construction

use thiserror::Error;

/// Errors raised by the time converters and the timer engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// A parser was handed an empty string
    #[error("{0} expects a non-empty string argument")]
    MissingArgument(&'static str),

    /// The input matched none of the accepted patterns
    #[error("invalid time string: {0:?}")]
    InvalidFormat(String),

    /// The timer configuration cannot be run
    #[error("invalid timer configuration: {0}")]
    InvalidConfig(String),
}
