//! Working-hours service.
//!
//! Resolves the availability snapshot for one staff member on one day.
//! Resolution order, most specific first: a date override for that
//! staff member, a date override for the whole business, the staff
//! member's weekly hours, the business weekly hours. The grid receives
//! the result as authoritative and never re-resolves it.

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::availability::{BreakInterval, StaffAvailability};
use crate::utils::time::parse_clock;

/// Service for business and per-staff working hours stored in SQLite.
pub struct HoursService<'a> {
    conn: &'a Connection,
}

/// Raw hours row before it becomes a snapshot.
struct HoursRow {
    is_open: bool,
    open_time: Option<String>,
    close_time: Option<String>,
    breaks: Option<String>,
}

impl<'a> HoursService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Resolve the availability snapshot for one staff member and day.
    pub fn fetch_staff_hours(
        &self,
        staff_id: i64,
        date: NaiveDate,
    ) -> Result<StaffAvailability> {
        let weekday = date.weekday().num_days_from_monday() as i64;

        let row = self
            .override_for(date, Some(staff_id))?
            .or(self.override_for(date, None)?)
            .or(self.staff_weekly(staff_id, weekday)?)
            .or(self.business_weekly(weekday)?);

        match row {
            Some(row) => build_availability(staff_id, row),
            None => Ok(StaffAvailability::closed(staff_id)),
        }
    }

    /// Set the business-wide weekly hours for one weekday
    /// (0 = Monday .. 6 = Sunday). `None` closes that day.
    pub fn set_business_hours(
        &self,
        weekday: u32,
        hours: Option<(NaiveTime, NaiveTime)>,
        breaks: &[BreakInterval],
    ) -> Result<()> {
        let (is_open, open, close) = encode_hours(hours);
        self.conn
            .execute(
                "INSERT INTO business_hours (weekday, is_open, open_time, close_time, breaks)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(weekday) DO UPDATE SET
                    is_open = excluded.is_open,
                    open_time = excluded.open_time,
                    close_time = excluded.close_time,
                    breaks = excluded.breaks",
                params![weekday, is_open, open, close, encode_breaks(breaks)?],
            )
            .context("Failed to set business hours")?;
        Ok(())
    }

    /// Set one staff member's weekly hours for one weekday, shadowing
    /// the business hours. `None` marks the day off.
    pub fn set_staff_hours(
        &self,
        staff_id: i64,
        weekday: u32,
        hours: Option<(NaiveTime, NaiveTime)>,
        breaks: &[BreakInterval],
    ) -> Result<()> {
        let (is_working, start, end) = encode_hours(hours);
        self.conn
            .execute(
                "INSERT INTO staff_hours (staff_id, weekday, is_working, start_time, end_time, breaks)
                 VALUES (?, ?, ?, ?, ?, ?)
                 ON CONFLICT(staff_id, weekday) DO UPDATE SET
                    is_working = excluded.is_working,
                    start_time = excluded.start_time,
                    end_time = excluded.end_time,
                    breaks = excluded.breaks",
                params![staff_id, weekday, is_working, start, end, encode_breaks(breaks)?],
            )
            .context("Failed to set staff hours")?;
        Ok(())
    }

    /// Set a date-specific override, for the whole business
    /// (`staff_id = None`) or one staff member. `None` hours closes the
    /// date.
    pub fn set_override(
        &self,
        date: NaiveDate,
        staff_id: Option<i64>,
        hours: Option<(NaiveTime, NaiveTime)>,
        breaks: &[BreakInterval],
    ) -> Result<()> {
        let (is_open, open, close) = encode_hours(hours);
        // One override per (date, staff) scope: replace any previous row.
        match staff_id {
            Some(id) => self.conn.execute(
                "DELETE FROM schedule_overrides WHERE date = ? AND staff_id = ?",
                params![date.to_string(), id],
            ),
            None => self.conn.execute(
                "DELETE FROM schedule_overrides WHERE date = ? AND staff_id IS NULL",
                params![date.to_string()],
            ),
        }
        .context("Failed to clear previous override")?;

        self.conn
            .execute(
                "INSERT INTO schedule_overrides (staff_id, date, is_open, open_time, close_time, breaks)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    staff_id,
                    date.to_string(),
                    is_open,
                    open,
                    close,
                    encode_breaks(breaks)?
                ],
            )
            .context("Failed to set schedule override")?;
        Ok(())
    }

    fn override_for(&self, date: NaiveDate, staff_id: Option<i64>) -> Result<Option<HoursRow>> {
        let row = match staff_id {
            Some(id) => self
                .conn
                .query_row(
                    "SELECT is_open, open_time, close_time, breaks
                     FROM schedule_overrides WHERE date = ? AND staff_id = ?",
                    params![date.to_string(), id],
                    map_hours_row,
                )
                .optional(),
            None => self
                .conn
                .query_row(
                    "SELECT is_open, open_time, close_time, breaks
                     FROM schedule_overrides WHERE date = ? AND staff_id IS NULL",
                    params![date.to_string()],
                    map_hours_row,
                )
                .optional(),
        }
        .context("Failed to query schedule overrides")?;
        Ok(row)
    }

    fn staff_weekly(&self, staff_id: i64, weekday: i64) -> Result<Option<HoursRow>> {
        self.conn
            .query_row(
                "SELECT is_working, start_time, end_time, breaks
                 FROM staff_hours WHERE staff_id = ? AND weekday = ?",
                params![staff_id, weekday],
                map_hours_row,
            )
            .optional()
            .context("Failed to query staff hours")
    }

    fn business_weekly(&self, weekday: i64) -> Result<Option<HoursRow>> {
        self.conn
            .query_row(
                "SELECT is_open, open_time, close_time, breaks
                 FROM business_hours WHERE weekday = ?",
                [weekday],
                map_hours_row,
            )
            .optional()
            .context("Failed to query business hours")
    }
}

fn map_hours_row(row: &Row) -> rusqlite::Result<HoursRow> {
    Ok(HoursRow {
        is_open: row.get::<_, i32>(0)? != 0,
        open_time: row.get(1)?,
        close_time: row.get(2)?,
        breaks: row.get(3)?,
    })
}

fn encode_hours(
    hours: Option<(NaiveTime, NaiveTime)>,
) -> (i32, Option<String>, Option<String>) {
    match hours {
        Some((open, close)) => (
            1,
            Some(open.format("%H:%M").to_string()),
            Some(close.format("%H:%M").to_string()),
        ),
        None => (0, None, None),
    }
}

fn encode_breaks(breaks: &[BreakInterval]) -> Result<Option<String>> {
    if breaks.is_empty() {
        return Ok(None);
    }
    let json = serde_json::to_string(breaks).context("Failed to serialize breaks")?;
    Ok(Some(json))
}

fn build_availability(staff_id: i64, row: HoursRow) -> Result<StaffAvailability> {
    if !row.is_open {
        return Ok(StaffAvailability::closed(staff_id));
    }

    let open = row
        .open_time
        .as_deref()
        .and_then(parse_clock)
        .ok_or_else(|| anyhow!("Malformed open time for staff {}", staff_id))?;
    let close = row
        .close_time
        .as_deref()
        .and_then(parse_clock)
        .ok_or_else(|| anyhow!("Malformed close time for staff {}", staff_id))?;

    let breaks: Vec<BreakInterval> = match row.breaks {
        Some(json) => serde_json::from_str(&json).context("Malformed breaks column")?,
        None => Vec::new(),
    };

    StaffAvailability::new(staff_id, open, close, breaks).map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::staff::Staff;
    use crate::services::database::Database;
    use crate::services::staff::StaffService;

    fn setup() -> (Database, i64) {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        let staff_id = StaffService::new(db.connection())
            .create(Staff::new("Robin").unwrap())
            .unwrap()
            .id
            .unwrap();
        (db, staff_id)
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // A Saturday: seeded business hours are open, Sunday closed.
    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 16).unwrap()
    }

    #[test]
    fn test_falls_back_to_seeded_business_hours() {
        let (db, staff_id) = setup();
        let hours = HoursService::new(db.connection());

        let availability = hours.fetch_staff_hours(staff_id, saturday()).unwrap();
        assert!(availability.is_active);
        assert_eq!(availability.work_start, at(9, 0));
        assert_eq!(availability.work_end, at(17, 0));
        assert!(availability.breaks.is_empty());
    }

    #[test]
    fn test_seeded_sunday_is_closed() {
        let (db, staff_id) = setup();
        let hours = HoursService::new(db.connection());

        let availability = hours.fetch_staff_hours(staff_id, sunday()).unwrap();
        assert!(!availability.is_active);
    }

    #[test]
    fn test_staff_weekly_shadows_business() {
        let (db, staff_id) = setup();
        let hours = HoursService::new(db.connection());

        let weekday = saturday().weekday().num_days_from_monday();
        hours
            .set_staff_hours(
                staff_id,
                weekday,
                Some((at(12, 0), at(20, 0))),
                &[BreakInterval::new(at(16, 0), at(16, 30))],
            )
            .unwrap();

        let availability = hours.fetch_staff_hours(staff_id, saturday()).unwrap();
        assert_eq!(availability.work_start, at(12, 0));
        assert_eq!(availability.work_end, at(20, 0));
        assert_eq!(availability.breaks.len(), 1);
    }

    #[test]
    fn test_business_override_shadows_weekly() {
        let (db, staff_id) = setup();
        let hours = HoursService::new(db.connection());

        // Half day for the whole salon
        hours
            .set_override(saturday(), None, Some((at(9, 0), at(13, 0))), &[])
            .unwrap();

        let availability = hours.fetch_staff_hours(staff_id, saturday()).unwrap();
        assert_eq!(availability.work_end, at(13, 0));
    }

    #[test]
    fn test_staff_override_wins_over_everything() {
        let (db, staff_id) = setup();
        let hours = HoursService::new(db.connection());

        let weekday = saturday().weekday().num_days_from_monday();
        hours
            .set_staff_hours(staff_id, weekday, Some((at(12, 0), at(20, 0))), &[])
            .unwrap();
        hours
            .set_override(saturday(), None, Some((at(9, 0), at(13, 0))), &[])
            .unwrap();
        hours
            .set_override(saturday(), Some(staff_id), None, &[])
            .unwrap();

        let availability = hours.fetch_staff_hours(staff_id, saturday()).unwrap();
        assert!(!availability.is_active, "staff-specific day off wins");
    }

    #[test]
    fn test_override_replaces_previous_override() {
        let (db, staff_id) = setup();
        let hours = HoursService::new(db.connection());

        hours
            .set_override(saturday(), Some(staff_id), None, &[])
            .unwrap();
        hours
            .set_override(saturday(), Some(staff_id), Some((at(10, 0), at(14, 0))), &[])
            .unwrap();

        let availability = hours.fetch_staff_hours(staff_id, saturday()).unwrap();
        assert!(availability.is_active);
        assert_eq!(availability.work_start, at(10, 0));
    }

    #[test]
    fn test_breaks_round_trip_through_json_column() {
        let (db, staff_id) = setup();
        let hours = HoursService::new(db.connection());

        let breaks = vec![
            BreakInterval::new(at(13, 0), at(14, 0)),
            BreakInterval::new(at(16, 0), at(16, 15)),
        ];
        hours
            .set_business_hours(
                saturday().weekday().num_days_from_monday(),
                Some((at(9, 0), at(17, 0))),
                &breaks,
            )
            .unwrap();

        let availability = hours.fetch_staff_hours(staff_id, saturday()).unwrap();
        assert_eq!(availability.breaks, breaks);
    }
}
