//! Drag interaction state machine.
//!
//! Owns the live drag session for move and resize gestures. Pointer
//! events come in through a unified abstraction (mouse, single touch and
//! pen all reduce to a vertical position), and every move produces a
//! fresh candidate interval via the shared grid geometry and the
//! two-stage snap rule.

use chrono::{DateTime, Duration, Local};

use crate::grid::geometry::offset_to_minutes_delta;
use crate::models::appointment::Appointment;
use crate::models::settings::GridSettings;
use crate::utils::time::{local_at, minutes_of};

/// Which part of the appointment block the gesture grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Whole block: start and end shift together, duration invariant.
    Move,
    /// Top handle: start time changes, end fixed.
    ResizeStart,
    /// Bottom handle: end time changes, start fixed.
    ResizeEnd,
}

/// Unified pointer abstraction. Only the vertical position matters on
/// the grid; only the primary contact point is tracked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub y: f32,
}

/// The not-yet-committed time pair produced live during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateInterval {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl CandidateInterval {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// State captured atomically when a drag gesture starts.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub appointment_id: i64,
    pub staff_id: i64,
    pub mode: DragMode,
    pub original_start: DateTime<Local>,
    pub original_end: DateTime<Local>,
    /// Pointer position at gesture start.
    pub reference_pointer_y: f32,
    /// Pixel origin of the scrollable grid at gesture start.
    pub grid_top_offset: f32,
}

impl DragSession {
    pub fn original_interval(&self) -> CandidateInterval {
        CandidateInterval {
            start: self.original_start,
            end: self.original_end,
        }
    }
}

/// Single-session drag state machine: `idle` or `dragging`.
///
/// At most one session is active at a time. A refused transition is a
/// structural no-op, never a surfaced error.
#[derive(Debug)]
pub struct DragController {
    settings: GridSettings,
    session: Option<DragSession>,
    candidate: Option<CandidateInterval>,
}

impl DragController {
    pub fn new(settings: GridSettings) -> Self {
        Self {
            settings,
            session: None,
            candidate: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Whether this specific appointment is under an active drag.
    pub fn is_dragging_appointment(&self, appointment_id: i64) -> bool {
        self.session
            .as_ref()
            .map_or(false, |s| s.appointment_id == appointment_id)
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// The current candidate interval, or the original interval before
    /// the first pointer move.
    pub fn candidate(&self) -> Option<CandidateInterval> {
        self.candidate
            .or_else(|| self.session.as_ref().map(|s| s.original_interval()))
    }

    /// `idle -> dragging`. Refused while a session is active and for
    /// appointments in a terminal status; returns whether a session
    /// opened.
    pub fn begin(
        &mut self,
        appointment: &Appointment,
        mode: DragMode,
        pointer: PointerEvent,
        grid_top_offset: f32,
    ) -> bool {
        if self.session.is_some() {
            log::debug!("Ignoring drag start: a drag session is already active");
            return false;
        }
        let Some(appointment_id) = appointment.id else {
            log::debug!("Ignoring drag start on unsaved appointment");
            return false;
        };
        if appointment.status.is_terminal() {
            log::debug!(
                "Ignoring drag start on {} appointment {}",
                appointment.status.as_str(),
                appointment_id
            );
            return false;
        }

        self.session = Some(DragSession {
            appointment_id,
            staff_id: appointment.staff_id,
            mode,
            original_start: appointment.start,
            original_end: appointment.end,
            reference_pointer_y: pointer.y,
            grid_top_offset,
        });
        self.candidate = None;
        true
    }

    /// `dragging -> dragging`. Recomputes the candidate interval from
    /// the pointer position. When the proposed interval would violate a
    /// duration clamp or leave the day, the candidate freezes at its
    /// last valid value rather than applying a partial update.
    pub fn pointer_move(&mut self, pointer: PointerEvent) -> Option<CandidateInterval> {
        let session = self.session.as_ref()?;

        let delta_px = pointer.y - session.reference_pointer_y;
        let raw_delta = offset_to_minutes_delta(delta_px, self.settings.cell_height_px);
        // Stage one: snap the delta to the coarse grid.
        let unit = self.settings.snap_minutes;
        let delta_minutes = if unit > 1 {
            (raw_delta as f64 / unit as f64).round() as i64 * unit
        } else {
            raw_delta.round() as i64
        };

        if let Some(candidate) = self.propose(session, delta_minutes) {
            self.candidate = Some(candidate);
        }
        self.candidate()
    }

    /// `dragging -> idle` on release. Returns the session and its final
    /// candidate for the commit pipeline; the session is cleared
    /// unconditionally so the grid can never be left mid-drag.
    pub fn finish(&mut self) -> Option<(DragSession, CandidateInterval)> {
        let session = self.session.take()?;
        let candidate = self
            .candidate
            .take()
            .unwrap_or_else(|| session.original_interval());
        Some((session, candidate))
    }

    /// `dragging -> idle` with no commit attempt.
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Drag session canceled");
        }
        self.candidate = None;
    }

    /// Build the proposed interval for a snapped delta, or `None` when
    /// the result would be invalid (the caller keeps the last candidate).
    fn propose(&self, session: &DragSession, delta_minutes: i64) -> Option<CandidateInterval> {
        let day = session.original_start.date_naive();
        let original_start_min = minutes_of(session.original_start);
        let original_end_min = minutes_of(session.original_end);
        let fine = self.settings.fine_snap_minutes;

        let (start_min, end_min) = match session.mode {
            DragMode::Move => {
                // Stage two: snap the resulting absolute time, then
                // carry the original duration so it stays invariant.
                let start = snap(original_start_min + delta_minutes, fine);
                (start, start + (original_end_min - original_start_min))
            }
            DragMode::ResizeStart => {
                let start = snap(original_start_min + delta_minutes, fine);
                (start, original_end_min)
            }
            DragMode::ResizeEnd => {
                let end = snap(original_end_min + delta_minutes, fine);
                (original_start_min, end)
            }
        };

        let duration = end_min - start_min;
        if duration < self.settings.min_duration_minutes {
            return None;
        }
        // The duration ceiling only clamps resize; a move never changes
        // duration, so an already-long appointment stays movable.
        if session.mode != DragMode::Move && duration > self.settings.max_duration_minutes {
            return None;
        }
        if start_min < 0 || end_min > 24 * 60 {
            return None;
        }

        // A failed local-time conversion (DST gap) freezes the candidate
        // instead of erroring mid-gesture.
        let start = local_at(day, start_min)?;
        let end = local_at(day, end_min)?;
        Some(CandidateInterval { start, end })
    }
}

/// Round to the nearest multiple of `unit` (ties away from zero).
fn snap(minutes: i64, unit: i64) -> i64 {
    if unit <= 1 {
        return minutes;
    }
    (minutes as f64 / unit as f64).round() as i64 * unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::AppointmentStatus;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn appointment(id: i64, start_min: i64, end_min: i64) -> Appointment {
        let mut appointment = Appointment::new(
            1,
            local_at(day(), start_min).unwrap(),
            local_at(day(), end_min).unwrap(),
        )
        .unwrap();
        appointment.id = Some(id);
        appointment
    }

    fn controller() -> DragController {
        DragController::new(GridSettings::default())
    }

    #[test]
    fn test_snap_rounds_to_nearest_unit() {
        assert_eq!(snap(20, 15), 15);
        assert_eq!(snap(23, 15), 30);
        assert_eq!(snap(-20, 15), -15);
        assert_eq!(snap(-23, 15), -30);
        assert_eq!(snap(7, 5), 5);
        assert_eq!(snap(8, 5), 10);
    }

    #[test]
    fn test_begin_rejects_terminal_status() {
        let mut drag = controller();
        let mut appt = appointment(1, 600, 630);
        appt.status = AppointmentStatus::Canceled;
        assert!(!drag.begin(&appt, DragMode::Move, PointerEvent { y: 100.0 }, 0.0));
        assert!(!drag.is_dragging());

        appt.status = AppointmentStatus::Completed;
        assert!(!drag.begin(&appt, DragMode::Move, PointerEvent { y: 100.0 }, 0.0));
    }

    #[test]
    fn test_begin_rejects_second_session() {
        let mut drag = controller();
        let first = appointment(1, 600, 630);
        let second = appointment(2, 700, 730);
        assert!(drag.begin(&first, DragMode::Move, PointerEvent { y: 100.0 }, 0.0));
        assert!(!drag.begin(&second, DragMode::Move, PointerEvent { y: 200.0 }, 0.0));
        assert!(drag.is_dragging_appointment(1));
    }

    #[test]
    fn test_begin_rejects_unsaved_appointment() {
        let mut drag = controller();
        let mut appt = appointment(1, 600, 630);
        appt.id = None;
        assert!(!drag.begin(&appt, DragMode::Move, PointerEvent { y: 100.0 }, 0.0));
    }

    #[test]
    fn test_move_preserves_duration() {
        let mut drag = controller();
        let appt = appointment(1, 600, 650); // 10:00-10:50
        assert!(drag.begin(&appt, DragMode::Move, PointerEvent { y: 100.0 }, 0.0));

        // 60px down at 120px cells = 30 minutes
        let candidate = drag.pointer_move(PointerEvent { y: 160.0 }).unwrap();
        assert_eq!(minutes_of(candidate.start), 630);
        assert_eq!(minutes_of(candidate.end), 680);
        assert_eq!(candidate.duration(), Duration::minutes(50));
    }

    #[test]
    fn test_two_stage_snap_scenario() {
        // Bottom handle, pointer moved 40px down at 120px cells: the raw
        // delta is 20 minutes, which snaps to 15 before the 5-minute
        // absolute snap, so 10:30 extends to 10:45 rather than 10:50.
        let mut drag = controller();
        let appt = appointment(1, 600, 630); // 10:00-10:30
        assert!(drag.begin(&appt, DragMode::ResizeEnd, PointerEvent { y: 0.0 }, 0.0));

        let candidate = drag.pointer_move(PointerEvent { y: 40.0 }).unwrap();
        assert_eq!(minutes_of(candidate.start), 600);
        assert_eq!(minutes_of(candidate.end), 645);
    }

    #[test]
    fn test_fine_snap_applies_to_unaligned_start() {
        // Appointment starting at 10:07; a one-slot move lands on the
        // 5-minute grid: 10:07 + 15 = 10:22, snapped to 10:20.
        let mut drag = controller();
        let appt = appointment(1, 607, 652);
        assert!(drag.begin(&appt, DragMode::Move, PointerEvent { y: 0.0 }, 0.0));

        let candidate = drag.pointer_move(PointerEvent { y: 30.0 }).unwrap();
        assert_eq!(minutes_of(candidate.start), 620);
        // Duration stays 45 minutes even though the end is not 5-aligned
        assert_eq!(minutes_of(candidate.end), 665);
    }

    #[test]
    fn test_resize_start_clamps_at_minimum_duration() {
        let mut drag = controller();
        let appt = appointment(1, 600, 630); // 30 minutes long
        assert!(drag.begin(&appt, DragMode::ResizeStart, PointerEvent { y: 0.0 }, 0.0));

        // Shrink by 15: valid, 15 minutes remain
        let candidate = drag.pointer_move(PointerEvent { y: 30.0 }).unwrap();
        assert_eq!(minutes_of(candidate.start), 615);

        // Shrink past the floor: candidate freezes at the last valid value
        let candidate = drag.pointer_move(PointerEvent { y: 60.0 }).unwrap();
        assert_eq!(minutes_of(candidate.start), 615);
        assert_eq!(minutes_of(candidate.end), 630);
    }

    #[test]
    fn test_resize_end_clamps_at_maximum_duration() {
        let mut drag = controller();
        let appt = appointment(1, 540, 765); // 3h45m
        assert!(drag.begin(&appt, DragMode::ResizeEnd, PointerEvent { y: 0.0 }, 0.0));

        // +15 minutes: exactly four hours, accepted
        let candidate = drag.pointer_move(PointerEvent { y: 30.0 }).unwrap();
        assert_eq!(minutes_of(candidate.end), 780);

        // +30 minutes: past the ceiling, frozen at four hours
        let candidate = drag.pointer_move(PointerEvent { y: 60.0 }).unwrap();
        assert_eq!(minutes_of(candidate.end), 780);
    }

    #[test]
    fn test_move_frozen_at_day_boundary() {
        let mut drag = controller();
        let appt = appointment(1, 30, 90); // 00:30-01:30
        assert!(drag.begin(&appt, DragMode::Move, PointerEvent { y: 0.0 }, 0.0));

        // 120px up = -60 minutes, which would cross midnight
        let candidate = drag.pointer_move(PointerEvent { y: -120.0 }).unwrap();
        assert_eq!(minutes_of(candidate.start), 30);

        // A smaller step still works
        let candidate = drag.pointer_move(PointerEvent { y: -60.0 }).unwrap();
        assert_eq!(minutes_of(candidate.start), 0);
    }

    #[test]
    fn test_candidate_before_first_move_is_original() {
        let mut drag = controller();
        let appt = appointment(1, 600, 630);
        assert!(drag.begin(&appt, DragMode::Move, PointerEvent { y: 100.0 }, 0.0));
        let candidate = drag.candidate().unwrap();
        assert_eq!(candidate, drag.session().unwrap().original_interval());
    }

    #[test]
    fn test_finish_clears_session_and_returns_candidate() {
        let mut drag = controller();
        let appt = appointment(1, 600, 630);
        assert!(drag.begin(&appt, DragMode::Move, PointerEvent { y: 0.0 }, 0.0));
        drag.pointer_move(PointerEvent { y: 30.0 });

        let (session, candidate) = drag.finish().unwrap();
        assert_eq!(session.appointment_id, 1);
        assert_eq!(minutes_of(candidate.start), 615);
        assert!(!drag.is_dragging());
        assert!(drag.finish().is_none());
    }

    #[test]
    fn test_cancel_discards_session() {
        let mut drag = controller();
        let appt = appointment(1, 600, 630);
        assert!(drag.begin(&appt, DragMode::Move, PointerEvent { y: 0.0 }, 0.0));
        drag.pointer_move(PointerEvent { y: 30.0 });
        drag.cancel();
        assert!(!drag.is_dragging());
        assert!(drag.candidate().is_none());
    }

    #[test]
    fn test_pointer_move_while_idle_is_noop() {
        let mut drag = controller();
        assert!(drag.pointer_move(PointerEvent { y: 50.0 }).is_none());
    }
}
