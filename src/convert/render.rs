//! Rendering second counts as pretty or template-formatted strings

use super::structured::StructuredTime;

/// Render seconds as pretty time.
///
/// `100` becomes `1:40 min`, `34` becomes `34 sec` and `10000` becomes `2:46:40`.
pub fn to_pretty_string(total_seconds: u64) -> String {
    let t = StructuredTime::from(total_seconds);

    if t.hours > 0 {
        format!("{}:{}:{}", t.hours, minutes_text(&t), seconds_text(&t))
    } else if t.minutes > 0 {
        format!("{}:{} min", t.minutes, seconds_text(&t))
    } else {
        format!("{} sec", seconds_text(&t))
    }
}

/// Render seconds through a template.
///
/// Lowercase tokens (`%h %m %s %g %t`) take the values of hours, minutes,
/// seconds, total minutes and total seconds, with `%m` and `%s` padded to two
/// digits when a more significant unit is set. Uppercase tokens are always
/// padded to two digits. Each token replaces its first occurrence only.
pub fn to_formatted_string(total_seconds: u64, format: &str) -> String {
    let t = StructuredTime::from(total_seconds);
    let raw = [
        ("%h", t.hours.to_string()),
        ("%m", minutes_text(&t)),
        ("%s", seconds_text(&t)),
        ("%g", t.total_minutes.to_string()),
        ("%t", t.total_seconds.to_string()),
    ];
    let padded = [
        ("%H", t.hours),
        ("%M", t.minutes),
        ("%S", t.seconds),
        ("%G", t.total_minutes),
        ("%T", t.total_seconds),
    ];

    let mut out = format.to_string();
    for (token, value) in &raw {
        out = out.replacen(*token, value, 1);
    }
    for (token, value) in padded {
        out = out.replacen(token, &format!("{:02}", value), 1);
    }
    out
}

fn minutes_text(t: &StructuredTime) -> String {
    if t.pad_minutes() {
        format!("{:02}", t.minutes)
    } else {
        t.minutes.to_string()
    }
}

fn seconds_text(t: &StructuredTime) -> String {
    if t.pad_seconds() {
        format!("{:02}", t.seconds)
    } else {
        t.seconds.to_string()
    }
}

/// Render with a template when one is given, pretty time otherwise.
///
/// An empty template counts as no template.
pub fn render(total_seconds: u64, format: Option<&str>) -> String {
    match format {
        Some(format) if !format.is_empty() => to_formatted_string(total_seconds, format),
        _ => to_pretty_string(total_seconds),
    }
}
