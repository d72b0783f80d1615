//! Per-slot availability classification.
//!
//! [`DayAvailability`] is the staff availability snapshot compiled to
//! minutes-since-midnight once per day load, plus the queries the
//! conflict detector and the grid overlays need.

use serde::{Deserialize, Serialize};

use crate::models::availability::StaffAvailability;
use crate::utils::time::minutes_since_midnight;

/// Fractional span of a break within one hour cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakSpan {
    /// Offset of the break within the cell, as a fraction of cell height.
    pub start_fraction: f32,
    /// Height of the break within the cell, as a fraction of cell height.
    pub height_fraction: f32,
}

/// Classification of one hour cell for one staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SlotClass {
    FullyOpen,
    FullyClosed,
    /// Working hours start or end inside this cell. The leading and
    /// trailing closed fractions are computed independently; both can be
    /// non-zero on the same cell when the working day is shorter than
    /// an hour.
    PartiallyOpen {
        leading_closed: f32,
        trailing_closed: f32,
    },
    /// Cell is inside working hours but one or more breaks cross it.
    OnBreak { spans: Vec<BreakSpan> },
}

/// Working hours and breaks in minutes-since-midnight form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    pub is_active: bool,
    pub work_start: i64,
    pub work_end: i64,
    pub breaks: Vec<(i64, i64)>,
}

impl DayAvailability {
    /// Compile a staff availability snapshot to minute form.
    pub fn from_staff(availability: &StaffAvailability) -> Self {
        Self {
            is_active: availability.is_active,
            work_start: minutes_since_midnight(availability.work_start),
            work_end: minutes_since_midnight(availability.work_end),
            breaks: availability
                .breaks
                .iter()
                .map(|b| {
                    (
                        minutes_since_midnight(b.start),
                        minutes_since_midnight(b.end),
                    )
                })
                .collect(),
        }
    }

    /// Availability for a day off.
    pub fn closed() -> Self {
        Self {
            is_active: false,
            work_start: 0,
            work_end: 0,
            breaks: Vec::new(),
        }
    }

    /// Classify the hour cell `[hour*60, (hour+1)*60)`.
    pub fn classify(&self, hour: u32) -> SlotClass {
        let cell_start = hour as i64 * 60;
        let cell_end = cell_start + 60;

        if !self.is_active || cell_end <= self.work_start || cell_start >= self.work_end {
            return SlotClass::FullyClosed;
        }

        let leading_closed = if self.work_start > cell_start {
            (self.work_start - cell_start) as f32 / 60.0
        } else {
            0.0
        };
        let trailing_closed = if self.work_end < cell_end {
            (cell_end - self.work_end) as f32 / 60.0
        } else {
            0.0
        };
        if leading_closed > 0.0 || trailing_closed > 0.0 {
            return SlotClass::PartiallyOpen {
                leading_closed,
                trailing_closed,
            };
        }

        let spans: Vec<BreakSpan> = self
            .breaks
            .iter()
            .filter(|&&(start, end)| start < cell_end && end > cell_start)
            .map(|&(start, end)| BreakSpan {
                start_fraction: (start.max(cell_start) - cell_start) as f32 / 60.0,
                height_fraction: (end.min(cell_end) - start.max(cell_start)) as f32 / 60.0,
            })
            .collect();
        if !spans.is_empty() {
            return SlotClass::OnBreak { spans };
        }

        SlotClass::FullyOpen
    }

    /// Whether a candidate interval sits entirely inside working hours
    /// on a day the staff member works.
    pub fn is_within_working_hours(&self, start_min: i64, end_min: i64) -> bool {
        self.is_active && start_min >= self.work_start && end_min <= self.work_end
    }

    /// Whether a candidate interval crosses any break. Half-open
    /// interval test, so an appointment ending exactly when a break
    /// starts does not overlap it.
    pub fn overlaps_break(&self, start_min: i64, end_min: i64) -> bool {
        self.breaks
            .iter()
            .any(|&(break_start, break_end)| break_start < end_min && break_end > start_min)
    }
}
