//! Parsing duration strings and pretty time back into seconds

use crate::error::TimerError;

use super::structured::{SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

/// Convert a duration string such as `5m30s` into seconds.
///
/// A plain integer is taken as seconds. Otherwise the first one- or two-digit
/// `h`, `m` and `s` quantities are summed, case-insensitively and in any order.
pub fn parse_duration(text: &str) -> Result<u64, TimerError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TimerError::MissingArgument("parse_duration"));
    }

    if let Ok(seconds) = text.parse::<u64>() {
        return Ok(seconds);
    }

    let lowered = text.to_ascii_lowercase();
    let hours = find_unit(&lowered, b'h');
    let minutes = find_unit(&lowered, b'm');
    let seconds = find_unit(&lowered, b's');

    if hours.is_none() && minutes.is_none() && seconds.is_none() {
        return Err(TimerError::InvalidFormat(text.to_string()));
    }

    Ok(hours.unwrap_or(0) * SECONDS_PER_HOUR
        + minutes.unwrap_or(0) * SECONDS_PER_MINUTE
        + seconds.unwrap_or(0))
}

/// First occurrence of one or two digits directly followed by `unit`
fn find_unit(text: &str, unit: u8) -> Option<u64> {
    let bytes = text.as_bytes();

    (1..bytes.len())
        .filter(|&i| bytes[i] == unit && bytes[i - 1].is_ascii_digit())
        .map(|i| {
            let start = if i >= 2 && bytes[i - 2].is_ascii_digit() { i - 2 } else { i - 1 };
            bytes[start..i]
                .iter()
                .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
        })
        .next()
}

/// Convert pretty time (`S sec`, `M:SS min` or `H:MM:SS`) back into seconds.
///
/// Custom template output is not parseable.
pub fn parse_pretty_string(text: &str) -> Result<u64, TimerError> {
    let invalid = || TimerError::InvalidFormat(text.to_string());
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TimerError::MissingArgument("parse_pretty_string"));
    }

    if trimmed.contains("sec") {
        let seconds = trimmed.replace("sec", "");
        return parse_number(&seconds).ok_or_else(invalid);
    }

    if trimmed.contains("min") {
        let clock = trimmed.replace("min", "");
        return match clock.split(':').collect::<Vec<_>>().as_slice() {
            [minutes, seconds] => {
                let minutes = parse_number(minutes).ok_or_else(invalid)?;
                let seconds = parse_number(seconds).ok_or_else(invalid)?;
                clock_seconds(0, minutes, seconds).ok_or_else(invalid)
            }
            _ => Err(invalid()),
        };
    }

    match trimmed.split(':').collect::<Vec<_>>().as_slice() {
        [hours, minutes, seconds] if is_two_digits(minutes) && is_two_digits(seconds) => {
            let hours = parse_number(hours).ok_or_else(invalid)?;
            let minutes = parse_number(minutes).ok_or_else(invalid)?;
            let seconds = parse_number(seconds).ok_or_else(invalid)?;
            clock_seconds(hours, minutes, seconds).ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

/// `None` when the total does not fit in a `u64`
fn clock_seconds(hours: u64, minutes: u64, seconds: u64) -> Option<u64> {
    hours
        .checked_mul(SECONDS_PER_HOUR)?
        .checked_add(minutes.checked_mul(SECONDS_PER_MINUTE)?)?
        .checked_add(seconds)
}

fn parse_number(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn is_two_digits(text: &&str) -> bool {
    text.len() == 2 && text.bytes().all(|b| b.is_ascii_digit())
}
