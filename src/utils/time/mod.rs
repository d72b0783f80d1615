// Clock-time utility functions

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike};

/// Minutes elapsed since midnight for a clock time.
pub fn minutes_since_midnight(time: NaiveTime) -> i64 {
    time.hour() as i64 * 60 + time.minute() as i64
}

/// Minutes elapsed since midnight for a local timestamp.
pub fn minutes_of(datetime: DateTime<Local>) -> i64 {
    minutes_since_midnight(datetime.time())
}

/// Parse a "HH:MM" clock string.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Format minutes-since-midnight as "HH:MM".
pub fn format_minutes(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Build a local timestamp for a day plus minutes-since-midnight.
/// Returns `None` when the minutes fall outside the day or the local
/// time is ambiguous (DST fold).
pub fn local_at(day: NaiveDate, minutes: i64) -> Option<DateTime<Local>> {
    if !(0..=24 * 60).contains(&minutes) {
        return None;
    }
    let time = if minutes == 24 * 60 {
        NaiveTime::from_hms_opt(23, 59, 59)?
    } else {
        NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)?
    };
    day.and_time(time).and_local_timezone(Local).single()
}
