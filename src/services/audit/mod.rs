//! Audit trail for appointment time changes.
//!
//! Best-effort: the commit pipeline records through this sink after a
//! successful write and swallows any failure.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, Row};

use crate::grid::commit::AuditSink;

/// One recorded reschedule.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub id: i64,
    pub appointment_id: i64,
    pub actor: String,
    pub old_start: DateTime<Local>,
    pub old_end: DateTime<Local>,
    pub new_start: DateTime<Local>,
    pub new_end: DateTime<Local>,
    pub reason: String,
}

/// Service writing audit rows to SQLite.
pub struct AuditService<'a> {
    conn: &'a Connection,
}

impl<'a> AuditService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Audit history for one appointment, newest first.
    pub fn list_for_appointment(&self, appointment_id: i64) -> Result<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, appointment_id, actor, old_start, old_end, new_start, new_end, reason
             FROM audit_log
             WHERE appointment_id = ?
             ORDER BY id DESC",
        )?;

        let entries = stmt
            .query_map([appointment_id], map_entry_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }
}

impl AuditSink for AuditService<'_> {
    fn record_time_change(
        &self,
        appointment_id: i64,
        actor: &str,
        old: (DateTime<Local>, DateTime<Local>),
        new: (DateTime<Local>, DateTime<Local>),
        reason: &str,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO audit_log (
                    appointment_id, actor, old_start, old_end, new_start, new_end, reason
                ) VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    appointment_id,
                    actor,
                    old.0.to_rfc3339(),
                    old.1.to_rfc3339(),
                    new.0.to_rfc3339(),
                    new.1.to_rfc3339(),
                    reason,
                ],
            )
            .context("Failed to insert audit entry")?;
        Ok(())
    }
}

fn map_entry_row(row: &Row) -> rusqlite::Result<AuditEntry> {
    let parse = |value: String| {
        DateTime::parse_from_rfc3339(&value)
            .map(|dt| dt.with_timezone(&Local))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    };
    Ok(AuditEntry {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        actor: row.get(2)?,
        old_start: parse(row.get::<_, String>(3)?)?,
        old_end: parse(row.get::<_, String>(4)?)?,
        new_start: parse(row.get::<_, String>(5)?)?,
        new_end: parse(row.get::<_, String>(6)?)?,
        reason: row.get(7)?,
    })
}
