// Staff availability model
// Resolved working hours and breaks for one staff member on one day

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A break within working hours, e.g. lunch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl BreakInterval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

/// Resolved availability for one staff member on the selected day.
///
/// Built once per day/staff change by the hours service; the scheduling
/// grid treats it as an immutable snapshot for the whole day view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAvailability {
    pub staff_id: i64,
    pub is_active: bool,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    /// Ordered, non-overlapping, each fully inside working hours.
    pub breaks: Vec<BreakInterval>,
}

impl StaffAvailability {
    pub fn new(
        staff_id: i64,
        work_start: NaiveTime,
        work_end: NaiveTime,
        breaks: Vec<BreakInterval>,
    ) -> Result<Self, String> {
        let availability = Self {
            staff_id,
            is_active: true,
            work_start,
            work_end,
            breaks,
        };
        availability.validate()?;
        Ok(availability)
    }

    /// Availability for a day the staff member is off.
    pub fn closed(staff_id: i64) -> Self {
        Self {
            staff_id,
            is_active: false,
            work_start: NaiveTime::MIN,
            work_end: NaiveTime::MIN,
            breaks: Vec::new(),
        }
    }

    /// Validate the availability snapshot.
    pub fn validate(&self) -> Result<(), String> {
        if !self.is_active {
            return Ok(());
        }
        if self.work_end <= self.work_start {
            return Err("Work end must be after work start".to_string());
        }
        let mut previous_end: Option<NaiveTime> = None;
        for interval in &self.breaks {
            if interval.end <= interval.start {
                return Err("Break end must be after break start".to_string());
            }
            if interval.start < self.work_start || interval.end > self.work_end {
                return Err("Breaks must fall inside working hours".to_string());
            }
            if let Some(end) = previous_end {
                if interval.start < end {
                    return Err("Breaks must be ordered and non-overlapping".to_string());
                }
            }
            previous_end = Some(interval.end);
        }
        Ok(())
    }
}
