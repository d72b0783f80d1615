//! Staff roster service.

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};

use crate::models::staff::Staff;

/// Service for the staff roster stored in SQLite.
pub struct StaffService<'a> {
    conn: &'a Connection,
}

impl<'a> StaffService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new staff member.
    pub fn create(&self, mut staff: Staff) -> Result<Staff> {
        self.conn
            .execute(
                "INSERT INTO staff (name, active) VALUES (?, ?)",
                params![staff.name, staff.active as i32],
            )
            .context("Failed to insert staff member")?;

        staff.id = Some(self.conn.last_insert_rowid());
        Ok(staff)
    }

    /// Retrieve a staff member by ID.
    pub fn get(&self, id: i64) -> Result<Option<Staff>> {
        let result = self.conn.query_row(
            "SELECT id, name, active FROM staff WHERE id = ?",
            [id],
            |row| {
                Ok(Staff {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    active: row.get::<_, i32>(2)? != 0,
                })
            },
        );

        match result {
            Ok(staff) => Ok(Some(staff)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List active staff members ordered by name.
    pub fn list_active(&self) -> Result<Vec<Staff>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, active FROM staff WHERE active = 1 ORDER BY name ASC")?;

        let staff = stmt
            .query_map([], |row| {
                Ok(Staff {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    active: row.get::<_, i32>(2)? != 0,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(staff)
    }

    /// Mark a staff member inactive without deleting history.
    pub fn deactivate(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("UPDATE staff SET active = 0 WHERE id = ?", [id])
            .context("Failed to deactivate staff member")?;

        if rows_affected == 0 {
            return Err(anyhow!("Staff member with id {} not found", id));
        }

        Ok(())
    }
}
