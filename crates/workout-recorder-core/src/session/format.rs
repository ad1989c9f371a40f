const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;

/// Formats elapsed seconds as `MM:SS`, or `HH:MM:SS` from one hour onwards.
///
/// Hours are not capped; a counter past 99 hours simply gains digits.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / SECONDS_PER_HOUR;
    let mins = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = seconds % SECONDS_PER_MINUTE;

    if hours == 0 {
        format!("{:02}:{:02}", mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    }
}
