//! Conflict detection for proposed appointment intervals.
//!
//! Checks run in a fixed order and the first failure wins, so the user
//! always sees the most specific cause.

use thiserror::Error;

use crate::grid::drag::CandidateInterval;
use crate::grid::slots::DayAvailability;
use crate::models::appointment::Appointment;
use crate::models::settings::GridSettings;
use crate::utils::time::minutes_of;

/// Why a proposed interval was rejected. Always recoverable locally:
/// the dragged block reverts and the reason is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("appointment is shorter than the minimum duration")]
    DurationTooShort,
    #[error("appointment exceeds the maximum duration")]
    DurationTooLong,
    #[error("staff member is not working that day")]
    StaffInactive,
    #[error("appointment falls outside working hours")]
    OutsideWorkingHours,
    #[error("appointment overlaps a scheduled break")]
    OverlapsBreak,
    #[error("appointment overlaps an existing booking")]
    OverlapsAppointment,
}

impl RejectionReason {
    /// Rejections arising from the availability model share the same
    /// structural-unavailability user messaging.
    pub fn is_working_hours_class(&self) -> bool {
        matches!(
            self,
            RejectionReason::StaffInactive
                | RejectionReason::OutsideWorkingHours
                | RejectionReason::OverlapsBreak
        )
    }
}

/// Duration limits for a committed appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationLimits {
    pub min_minutes: i64,
    pub max_minutes: i64,
}

impl Default for DurationLimits {
    fn default() -> Self {
        Self {
            min_minutes: 15,
            max_minutes: 240,
        }
    }
}

impl From<&GridSettings> for DurationLimits {
    fn from(settings: &GridSettings) -> Self {
        Self {
            min_minutes: settings.min_duration_minutes,
            max_minutes: settings.max_duration_minutes,
        }
    }
}

/// Half-open interval overlap: `[s1, e1)` and `[s2, e2)` conflict iff
/// `s1 < e2 && s2 < e1`. The single inequality pair covers starts-inside,
/// ends-inside and fully-contains.
pub fn overlaps<T: PartialOrd>(s1: T, e1: T, s2: T, e2: T) -> bool {
    s1 < e2 && s2 < e1
}

/// Validate a candidate interval for one staff member's day.
///
/// `exclude_id` is the appointment being moved; it never conflicts with
/// itself, so a no-op drag always passes. Conflicts are scoped per
/// staff: other columns' bookings and breaks are not consulted.
pub fn validate(
    candidate: &CandidateInterval,
    staff_id: i64,
    exclude_id: Option<i64>,
    appointments: &[Appointment],
    availability: &DayAvailability,
    limits: DurationLimits,
) -> Result<(), RejectionReason> {
    let duration = candidate.duration();
    if duration < chrono::Duration::minutes(limits.min_minutes) {
        return Err(RejectionReason::DurationTooShort);
    }
    if duration > chrono::Duration::minutes(limits.max_minutes) {
        return Err(RejectionReason::DurationTooLong);
    }

    // An inactive day always surfaces as StaffInactive, regardless of
    // where the candidate sits.
    if !availability.is_active {
        return Err(RejectionReason::StaffInactive);
    }

    let start_min = minutes_of(candidate.start);
    let end_min = minutes_of(candidate.end);
    if !availability.is_within_working_hours(start_min, end_min) {
        return Err(RejectionReason::OutsideWorkingHours);
    }
    if availability.overlaps_break(start_min, end_min) {
        return Err(RejectionReason::OverlapsBreak);
    }

    let conflict = appointments.iter().any(|other| {
        other.staff_id == staff_id
            && other.id.is_some()
            && other.id != exclude_id
            && other.status.blocks_time()
            && overlaps(candidate.start, candidate.end, other.start, other.end)
    });
    if conflict {
        return Err(RejectionReason::OverlapsAppointment);
    }

    Ok(())
}
