use chrono::DateTime;

/// Turns a timestamp (seconds since the Unix epoch) into label text.
///
/// The scrubber knows nothing about locales; hosts plug their own formatter
/// in. Any `Fn(f64) -> String` works.
pub trait TimestampFormat {
    fn format_timestamp(&self, time: f64) -> String;
}

impl<F> TimestampFormat for F
where
    F: Fn(f64) -> String,
{
    fn format_timestamp(&self, time: f64) -> String {
        self(time)
    }
}

/// `HH:MM:SS` in UTC.
///
/// # Example
/// ```
/// use scrubber::format::{TimestampFormat, UtcClockFormat};
///
/// assert_eq!(UtcClockFormat.format_timestamp(3_723.9), "01:02:03");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcClockFormat;

impl TimestampFormat for UtcClockFormat {
    fn format_timestamp(&self, time: f64) -> String {
        let secs = time.floor();
        let nanos = ((time - secs) * 1e9) as u32;
        match DateTime::from_timestamp(secs as i64, nanos) {
            Some(at) => at.format("%H:%M:%S").to_string(),
            None => format!("{time:.0}"),
        }
    }
}
