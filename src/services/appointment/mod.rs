//! Appointment service entry point.
//! Database-backed operations for appointments, organized across
//! focused submodules, plus the store boundary the scheduling grid
//! commits through.

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::Connection;

use crate::grid::commit::AppointmentStore;
use crate::models::appointment::Appointment;

pub mod crud;
pub mod queries;
mod shared;

/// Service for managing appointments stored in SQLite.
pub struct AppointmentService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> AppointmentService<'a> {
    /// Create a new AppointmentService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl AppointmentStore for AppointmentService<'_> {
    fn fetch_appointments(&self, staff_id: i64, day: NaiveDate) -> Result<Vec<Appointment>> {
        self.list_for_staff_day(staff_id, day)
    }

    fn update_appointment_time(
        &self,
        appointment_id: i64,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<()> {
        self.update_time(appointment_id, start, end)
    }
}
