use chrono::{DateTime, Utc};

const MILLIS_PER_SECOND: u64 = 1000;

/// This is the standard way of converting accumulated milliseconds to a string in timerboard.
/// Output is always `HH:MM:SS`, hours are not wrapped at 24.
pub fn render_elapsed_string(elapsed_ms: u64) -> String {
    let total_seconds = elapsed_ms / MILLIS_PER_SECOND;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Same as [render_elapsed_string], but includes the current run when `running_since` is set.
pub fn render_elapsed_string_at(
    elapsed_ms: u64,
    running_since: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> String {
    render_elapsed_string(elapsed_ms + running_since.map_or(0, |since| millis_between(since, now)))
}

/// Milliseconds from `from` to `to`. A clock that stepped backwards yields zero.
pub fn millis_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_milliseconds()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::{millis_between, render_elapsed_string, render_elapsed_string_at};

    #[test]
    fn renders_zero() {
        assert_eq!(render_elapsed_string(0), "00:00:00");
    }

    #[test]
    fn renders_hours_minutes_seconds() {
        assert_eq!(render_elapsed_string(5456099), "01:30:56");
        assert_eq!(render_elapsed_string(1273998), "00:21:13");
    }

    #[test]
    fn does_not_wrap_hours() {
        assert_eq!(render_elapsed_string(25 * 3600 * 1000), "25:00:00");
        assert_eq!(render_elapsed_string(100 * 3600 * 1000 + 61_000), "100:01:01");
    }

    #[test]
    fn truncates_partial_seconds() {
        assert_eq!(render_elapsed_string(999), "00:00:00");
        assert_eq!(render_elapsed_string(59_999), "00:00:59");
    }

    #[test]
    fn running_adds_current_run() {
        let since = DateTime::from_timestamp_millis(10_000).unwrap();
        let now = DateTime::from_timestamp_millis(70_000).unwrap();
        assert_eq!(render_elapsed_string_at(1000, Some(since), now), "00:01:01");
        assert_eq!(render_elapsed_string_at(1000, None, now), "00:00:01");
    }

    #[test]
    fn backwards_clock_counts_as_zero() {
        let since = DateTime::from_timestamp_millis(10_000).unwrap();
        let now = DateTime::from_timestamp_millis(5_000).unwrap();
        assert_eq!(millis_between(since, now), 0);
        assert_eq!(render_elapsed_string_at(2000, Some(since), now), "00:00:02");
    }
}
