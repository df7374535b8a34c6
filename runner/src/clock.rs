//! Human-readable elapsed time.

use std::time::Duration;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Format as `H:MM:SS`, prefixed with `N day(s), ` past 24 hours.
/// Sub-second precision is truncated.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let days = total / SECS_PER_DAY;
    let rest = total % SECS_PER_DAY;
    let (hours, minutes, seconds) = (rest / 3600, rest % 3600 / 60, rest % 60);

    let clock = format!("{hours}:{minutes:02}:{seconds:02}");
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}
