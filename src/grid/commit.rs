//! Commit pipeline and the day board that owns the scheduling state.
//!
//! On drag release the final candidate is re-validated against the
//! board's current appointments (never the last rendered frame), then
//! applied optimistically and handed to the store. A failed write rolls
//! the optimistic update back; a failed audit record never does.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use thiserror::Error;

use crate::grid::conflict::{self, DurationLimits, RejectionReason};
use crate::grid::drag::{CandidateInterval, DragController, DragMode, PointerEvent};
use crate::grid::layout::{self, GridLayout};
use crate::grid::slots::DayAvailability;
use crate::models::appointment::Appointment;
use crate::models::availability::StaffAvailability;
use crate::models::settings::GridSettings;

/// Read/write boundary to the appointment store.
///
/// `update_appointment_time` must be atomic: start and end are written
/// in one transactional call.
#[cfg_attr(test, mockall::automock)]
pub trait AppointmentStore {
    /// All appointments for that staff/day, including canceled ones.
    fn fetch_appointments(&self, staff_id: i64, day: NaiveDate) -> Result<Vec<Appointment>>;

    fn update_appointment_time(
        &self,
        appointment_id: i64,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<()>;
}

/// Best-effort audit trail for reschedules.
#[cfg_attr(test, mockall::automock)]
pub trait AuditSink {
    fn record_time_change(
        &self,
        appointment_id: i64,
        actor: &str,
        old: (DateTime<Local>, DateTime<Local>),
        new: (DateTime<Local>, DateTime<Local>),
        reason: &str,
    ) -> Result<()>;
}

/// Why a commit did not go through.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The proposed time is not legal; the user must pick another slot.
    #[error("{0}")]
    Rejected(#[from] RejectionReason),
    /// The change was accepted logically but the write failed; the user
    /// may retry.
    #[error("failed to save the new appointment time: {0}")]
    Persistence(#[source] anyhow::Error),
}

/// One day's scheduling state: appointments and availability per staff
/// member, the drag state machine, and pending-commit bookkeeping.
pub struct ScheduleBoard {
    day: NaiveDate,
    settings: GridSettings,
    staff_ids: Vec<i64>,
    appointments: Vec<Appointment>,
    availability: HashMap<i64, DayAvailability>,
    drag: DragController,
    /// Appointments with an unresolved store write; not draggable until
    /// the write settles.
    pending_commits: HashSet<i64>,
}

impl ScheduleBoard {
    pub fn new(day: NaiveDate, settings: GridSettings) -> Self {
        let drag = DragController::new(settings.clone());
        Self {
            day,
            settings,
            staff_ids: Vec::new(),
            appointments: Vec::new(),
            availability: HashMap::new(),
            drag,
            pending_commits: HashSet::new(),
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Attach one staff member's availability snapshot and appointments.
    pub fn attach_staff(
        &mut self,
        availability: &StaffAvailability,
        appointments: Vec<Appointment>,
    ) {
        let staff_id = availability.staff_id;
        if !self.staff_ids.contains(&staff_id) {
            self.staff_ids.push(staff_id);
        }
        self.availability
            .insert(staff_id, DayAvailability::from_staff(availability));
        self.appointments.retain(|a| a.staff_id != staff_id);
        self.appointments.extend(appointments);
    }

    /// Load a full day from the store and an availability source.
    pub fn load_day(
        &mut self,
        store: &impl AppointmentStore,
        availability: Vec<StaffAvailability>,
    ) -> Result<()> {
        for staff in availability {
            let appointments = store.fetch_appointments(staff.staff_id, self.day)?;
            self.attach_staff(&staff, appointments);
        }
        Ok(())
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn appointment(&self, appointment_id: i64) -> Option<&Appointment> {
        self.appointments
            .iter()
            .find(|a| a.id == Some(appointment_id))
    }

    /// Open a drag session. Structural no-op (returns `false`) for
    /// unknown ids, terminal statuses, a second concurrent session, or
    /// an appointment whose previous commit is still pending.
    pub fn begin_drag(
        &mut self,
        appointment_id: i64,
        mode: DragMode,
        pointer: PointerEvent,
        grid_top_offset: f32,
    ) -> bool {
        if self.pending_commits.contains(&appointment_id) {
            log::debug!(
                "Ignoring drag start: appointment {} has a pending commit",
                appointment_id
            );
            return false;
        }
        let Some(appointment) = self.appointment(appointment_id).cloned() else {
            log::debug!("Ignoring drag start on unknown appointment {}", appointment_id);
            return false;
        };
        self.drag.begin(&appointment, mode, pointer, grid_top_offset)
    }

    /// Forward a pointer move to the drag state machine.
    pub fn pointer_move(&mut self, pointer: PointerEvent) -> Option<CandidateInterval> {
        self.drag.pointer_move(pointer)
    }

    /// Tear down the drag session without a commit attempt.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Release the pointer: validate the final candidate and commit it.
    ///
    /// The session is cleared before validation runs, so the grid is
    /// never stuck mid-drag whatever the outcome. On rejection nothing
    /// is mutated and the block reverts to its persisted interval; on a
    /// failed write the optimistic update is rolled back.
    pub fn release_drag(
        &mut self,
        store: &impl AppointmentStore,
        audit: &impl AuditSink,
        actor: &str,
    ) -> Result<(), CommitError> {
        let Some((session, candidate)) = self.drag.finish() else {
            return Ok(());
        };
        self.commit(
            &candidate,
            session.appointment_id,
            session.staff_id,
            store,
            audit,
            actor,
        )
    }

    /// Re-validate and persist a candidate interval for one appointment.
    pub fn commit(
        &mut self,
        candidate: &CandidateInterval,
        appointment_id: i64,
        staff_id: i64,
        store: &impl AppointmentStore,
        audit: &impl AuditSink,
        actor: &str,
    ) -> Result<(), CommitError> {
        let availability = self
            .availability
            .get(&staff_id)
            .cloned()
            .unwrap_or_else(DayAvailability::closed);

        conflict::validate(
            candidate,
            staff_id,
            Some(appointment_id),
            &self.appointments,
            &availability,
            DurationLimits::from(&self.settings),
        )?;

        let Some(index) = self
            .appointments
            .iter()
            .position(|a| a.id == Some(appointment_id))
        else {
            // Unknown appointment: treat as a no-op rather than invent a
            // rejection the user cannot act on.
            log::warn!("Commit for unknown appointment {}", appointment_id);
            return Ok(());
        };

        let old_start = self.appointments[index].start;
        let old_end = self.appointments[index].end;

        // Optimistic update: the grid reflects the change immediately.
        self.appointments[index].start = candidate.start;
        self.appointments[index].end = candidate.end;
        self.pending_commits.insert(appointment_id);

        match store.update_appointment_time(appointment_id, candidate.start, candidate.end) {
            Ok(()) => {
                self.pending_commits.remove(&appointment_id);
                log::info!(
                    "Appointment {} moved: {} -> {}",
                    appointment_id,
                    old_start.format("%H:%M"),
                    candidate.start.format("%H:%M")
                );
                // Fire-and-forget: a failed audit record never rolls
                // back the committed change.
                if let Err(e) = audit.record_time_change(
                    appointment_id,
                    actor,
                    (old_start, old_end),
                    (candidate.start, candidate.end),
                    "drag",
                ) {
                    log::warn!("Audit record failed for appointment {}: {}", appointment_id, e);
                }
                Ok(())
            }
            Err(e) => {
                // Roll back the optimistic update.
                self.appointments[index].start = old_start;
                self.appointments[index].end = old_end;
                self.pending_commits.remove(&appointment_id);
                log::warn!("Failed to persist appointment {}: {}", appointment_id, e);
                Err(CommitError::Persistence(e))
            }
        }
    }

    /// Lay out the current day view.
    pub fn layout(&self, now: Option<NaiveTime>) -> GridLayout {
        let active_drag = self
            .drag
            .session()
            .map(|s| (s, self.drag.candidate().unwrap_or_else(|| s.original_interval())));
        layout::layout_day(
            &self.staff_ids,
            |staff_id| {
                self.availability
                    .get(&staff_id)
                    .cloned()
                    .unwrap_or_else(DayAvailability::closed)
            },
            &self.appointments,
            active_drag
                .as_ref()
                .map(|(session, candidate)| (*session, candidate)),
            &self.settings,
            now,
        )
    }
}
