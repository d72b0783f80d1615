use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{self, Row};

use super::shared::{status_from_column, to_local_datetime};
use super::AppointmentService;
use crate::models::appointment::Appointment;

impl<'a> AppointmentService<'a> {
    /// All appointments for one staff member on one day, ordered by
    /// start time. Canceled and completed appointments are included;
    /// the grid needs them for display and filters drag eligibility
    /// itself.
    pub fn list_for_staff_day(
        &self,
        staff_id: i64,
        day: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, staff_id, start_datetime, end_datetime, status,
                    customer_name, service_name, paid, invoiced,
                    created_at, updated_at
             FROM appointments
             WHERE staff_id = ? AND day = ?
             ORDER BY start_datetime ASC",
        )?;

        let appointments = stmt
            .query_map(
                rusqlite::params![staff_id, day.to_string()],
                map_appointment_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(appointments)
    }

    /// Every appointment on one day across all staff, ordered by start.
    pub fn list_for_day(&self, day: NaiveDate) -> Result<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, staff_id, start_datetime, end_datetime, status,
                    customer_name, service_name, paid, invoiced,
                    created_at, updated_at
             FROM appointments
             WHERE day = ?
             ORDER BY start_datetime ASC",
        )?;

        let appointments = stmt
            .query_map([day.to_string()], map_appointment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(appointments)
    }
}

fn map_appointment_row(row: &Row) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: Some(row.get(0)?),
        staff_id: row.get(1)?,
        start: to_local_datetime(row.get::<_, String>(2)?)?,
        end: to_local_datetime(row.get::<_, String>(3)?)?,
        status: status_from_column(row.get::<_, String>(4)?)?,
        customer_name: row.get(5)?,
        service_name: row.get(6)?,
        paid: row.get::<_, i32>(7)? != 0,
        invoiced: row.get::<_, i32>(8)? != 0,
        created_at: Some(to_local_datetime(row.get::<_, String>(9)?)?),
        updated_at: Some(to_local_datetime(row.get::<_, String>(10)?)?),
    })
}
