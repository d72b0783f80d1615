use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use rusqlite::{self, params};

use super::shared::{status_from_column, to_local_datetime};
use super::AppointmentService;
use crate::models::appointment::Appointment;

impl<'a> AppointmentService<'a> {
    /// Create a new appointment in the database.
    pub fn create(&self, mut appointment: Appointment) -> Result<Appointment> {
        appointment.validate().map_err(|e| anyhow!(e))?;

        let now = Local::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO appointments (
                    staff_id, day, start_datetime, end_datetime, status,
                    customer_name, service_name, paid, invoiced,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    appointment.staff_id,
                    appointment.start.date_naive().to_string(),
                    appointment.start.to_rfc3339(),
                    appointment.end.to_rfc3339(),
                    appointment.status.as_str(),
                    appointment.customer_name,
                    appointment.service_name,
                    appointment.paid as i32,
                    appointment.invoiced as i32,
                    &now,
                    &now,
                ],
            )
            .context("Failed to insert appointment")?;

        let id = self.conn.last_insert_rowid();
        appointment.id = Some(id);
        appointment.created_at = Some(Local::now());
        appointment.updated_at = Some(Local::now());

        Ok(appointment)
    }

    /// Retrieve an appointment by ID.
    pub fn get(&self, id: i64) -> Result<Option<Appointment>> {
        let result = self.conn.query_row(
            "SELECT id, staff_id, start_datetime, end_datetime, status,
                    customer_name, service_name, paid, invoiced,
                    created_at, updated_at
             FROM appointments WHERE id = ?",
            [id],
            |row| {
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
            },
        );

        match result {
            Ok(appointment) => Ok(Some(appointment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Update an existing appointment.
    pub fn update(&self, appointment: &Appointment) -> Result<()> {
        let id = appointment
            .id
            .ok_or_else(|| anyhow!("Appointment ID is required for update"))?;
        appointment.validate().map_err(|e| anyhow!(e))?;

        let rows_affected = self
            .conn
            .execute(
                "UPDATE appointments SET
                    staff_id = ?, day = ?, start_datetime = ?, end_datetime = ?,
                    status = ?, customer_name = ?, service_name = ?,
                    paid = ?, invoiced = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    appointment.staff_id,
                    appointment.start.date_naive().to_string(),
                    appointment.start.to_rfc3339(),
                    appointment.end.to_rfc3339(),
                    appointment.status.as_str(),
                    appointment.customer_name,
                    appointment.service_name,
                    appointment.paid as i32,
                    appointment.invoiced as i32,
                    Local::now().to_rfc3339(),
                    id,
                ],
            )
            .context("Failed to update appointment")?;

        if rows_affected == 0 {
            return Err(anyhow!("Appointment with id {} not found", id));
        }

        Ok(())
    }

    /// Write new start and end times in a single atomic statement.
    /// A partial write (start moved, end not) would be an unrecoverable
    /// inconsistency, so both columns always change together.
    pub fn update_time(
        &self,
        id: i64,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<()> {
        if end <= start {
            return Err(anyhow!("Appointment end time must be after start time"));
        }

        let rows_affected = self
            .conn
            .execute(
                "UPDATE appointments SET
                    day = ?, start_datetime = ?, end_datetime = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    start.date_naive().to_string(),
                    start.to_rfc3339(),
                    end.to_rfc3339(),
                    Local::now().to_rfc3339(),
                    id,
                ],
            )
            .context("Failed to update appointment time")?;

        if rows_affected == 0 {
            return Err(anyhow!("Appointment with id {} not found", id));
        }

        Ok(())
    }

    /// Delete an appointment by ID.
    pub fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])
            .context("Failed to delete appointment")?;

        if rows_affected == 0 {
            return Err(anyhow!("Appointment with id {} not found", id));
        }

        Ok(())
    }
}
