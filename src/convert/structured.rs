//! Breaking a second count into hours, minutes and seconds

use serde::{Deserialize, Serialize};

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_HOUR: u64 = 3600;

/// A second count split into display units.
///
/// All fields are plain integers. Zero padding is decided by the renderers,
/// never stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuredTime {
    /// Whole hours, 0 below one hour
    pub hours: u64,
    /// Minutes within the hour when `hours > 0`, otherwise all minutes
    pub minutes: u64,
    /// Whole minutes regardless of hours
    pub total_minutes: u64,
    /// Seconds within the minute
    pub seconds: u64,
    /// The input second count
    pub total_seconds: u64,
}

impl StructuredTime {
    /// Whether minutes render as two digits (a more significant unit is set)
    pub fn pad_minutes(&self) -> bool {
        self.hours > 0
    }

    /// Whether seconds render as two digits (a more significant unit is set)
    pub fn pad_seconds(&self) -> bool {
        self.hours > 0 || self.minutes > 0
    }
}

impl From<u64> for StructuredTime {
    fn from(total_seconds: u64) -> Self {
        to_structured(total_seconds)
    }
}

/// Split `total_seconds` into hours, minutes and seconds
pub fn to_structured(total_seconds: u64) -> StructuredTime {
    let total_minutes = total_seconds / SECONDS_PER_MINUTE;
    let hours = total_seconds / SECONDS_PER_HOUR;
    let minutes = if hours > 0 {
        (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE
    } else {
        total_minutes
    };

    StructuredTime {
        hours,
        minutes,
        total_minutes,
        seconds: total_seconds % SECONDS_PER_MINUTE,
        total_seconds,
    }
}
