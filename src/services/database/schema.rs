use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_staff_table(conn)?;
    create_appointments_table(conn)?;
    run_appointment_migrations(conn)?;
    create_hours_tables(conn)?;
    seed_business_hours(conn)?;
    create_audit_table(conn)?;
    Ok(())
}

fn create_staff_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS staff (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create staff table")?;

    Ok(())
}

fn create_appointments_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS appointments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            staff_id INTEGER NOT NULL REFERENCES staff(id),
            day TEXT NOT NULL,
            start_datetime TEXT NOT NULL,
            end_datetime TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'booked',
            customer_name TEXT,
            service_name TEXT,
            paid INTEGER NOT NULL DEFAULT 0,
            invoiced INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create appointments table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_appointments_staff_day
         ON appointments (staff_id, day)",
        [],
    )
    .context("Failed to create appointments index")?;

    Ok(())
}

fn run_appointment_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "appointments",
        "invoiced",
        "ALTER TABLE appointments ADD COLUMN invoiced INTEGER NOT NULL DEFAULT 0",
    )?;

    Ok(())
}

fn create_hours_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS business_hours (
            weekday INTEGER PRIMARY KEY CHECK (weekday BETWEEN 0 AND 6),
            is_open INTEGER NOT NULL DEFAULT 1,
            open_time TEXT,
            close_time TEXT,
            breaks TEXT
        )",
        [],
    )
    .context("Failed to create business_hours table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS staff_hours (
            staff_id INTEGER NOT NULL REFERENCES staff(id),
            weekday INTEGER NOT NULL CHECK (weekday BETWEEN 0 AND 6),
            is_working INTEGER NOT NULL DEFAULT 1,
            start_time TEXT,
            end_time TEXT,
            breaks TEXT,
            PRIMARY KEY (staff_id, weekday)
        )",
        [],
    )
    .context("Failed to create staff_hours table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schedule_overrides (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            staff_id INTEGER REFERENCES staff(id),
            date TEXT NOT NULL,
            is_open INTEGER NOT NULL DEFAULT 1,
            open_time TEXT,
            close_time TEXT,
            breaks TEXT
        )",
        [],
    )
    .context("Failed to create schedule_overrides table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_overrides_date
         ON schedule_overrides (date)",
        [],
    )
    .context("Failed to create schedule_overrides index")?;

    Ok(())
}

/// Default salon week: Monday through Saturday 09:00-17:00, closed Sunday.
fn seed_business_hours(conn: &Connection) -> Result<()> {
    for weekday in 0..6 {
        conn.execute(
            "INSERT OR IGNORE INTO business_hours (weekday, is_open, open_time, close_time)
             VALUES (?, 1, '09:00', '17:00')",
            [weekday],
        )
        .context("Failed to seed business hours")?;
    }
    conn.execute(
        "INSERT OR IGNORE INTO business_hours (weekday, is_open) VALUES (6, 0)",
        [],
    )
    .context("Failed to seed business hours")?;

    Ok(())
}

fn create_audit_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS audit_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            appointment_id INTEGER NOT NULL,
            actor TEXT NOT NULL,
            old_start TEXT NOT NULL,
            old_end TEXT NOT NULL,
            new_start TEXT NOT NULL,
            new_end TEXT NOT NULL,
            reason TEXT NOT NULL,
            recorded_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create audit_log table")?;

    Ok(())
}
