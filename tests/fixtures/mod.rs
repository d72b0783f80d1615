// Test fixtures - reusable test data
// Provides consistent test data across the integration and property tests

#![allow(dead_code)]

use chrono::{DateTime, Local, NaiveDate, NaiveTime};

use salon_scheduler::models::appointment::Appointment;
use salon_scheduler::models::availability::{BreakInterval, StaffAvailability};
use salon_scheduler::utils::time::local_at;

/// A quiet mid-March Saturday with no DST transition.
pub fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

pub fn clock(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn timestamp(minutes: i64) -> DateTime<Local> {
    local_at(test_day(), minutes).unwrap()
}

/// A booked appointment on the test day, times in minutes since midnight.
pub fn appointment(staff_id: i64, start_min: i64, end_min: i64) -> Appointment {
    Appointment::new(staff_id, timestamp(start_min), timestamp(end_min)).unwrap()
}

/// Standard salon day: 09:00-17:00 with a one-hour lunch break.
pub fn nine_to_five_with_lunch(staff_id: i64) -> StaffAvailability {
    StaffAvailability::new(
        staff_id,
        clock(9, 0),
        clock(17, 0),
        vec![BreakInterval::new(clock(13, 0), clock(14, 0))],
    )
    .unwrap()
}
