//! Duration components from elapsed milliseconds.

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Seconds component (0-59), always two digits.
pub fn seconds(ms: u64) -> String {
    with_leading_zero((ms / MS_PER_SECOND) % 60)
}

/// Minutes component (0-59). Two digits when `leading_zero` is set.
pub fn minutes(ms: u64, leading_zero: bool) -> String {
    let minutes = (ms / MS_PER_MINUTE) % 60;
    if leading_zero {
        with_leading_zero(minutes)
    } else {
        minutes.to_string()
    }
}

/// Whole hours, unbounded and unpadded.
pub fn hours(ms: u64) -> String {
    (ms / MS_PER_HOUR).to_string()
}

/// Pads single-digit values with a `0`.
pub fn with_leading_zero(value: u64) -> String {
    format!("{:02}", value)
}

/// Renders `H:MM:SS` once an hour has elapsed, `M:SS` before that.
pub fn complete_time(ms: u64) -> String {
    if ms >= MS_PER_HOUR {
        format!("{}:{}:{}", hours(ms), minutes(ms, true), seconds(ms))
    } else {
        format!("{}:{}", minutes(ms, false), seconds(ms))
    }
}
