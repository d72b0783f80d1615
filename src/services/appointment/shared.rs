use chrono::{DateTime, Local};
use rusqlite::{self, Result};

use crate::models::appointment::AppointmentStatus;

pub(crate) fn to_local_datetime(value: String) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(crate) fn status_from_column(value: String) -> Result<AppointmentStatus> {
    AppointmentStatus::parse(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown appointment status '{}'", value).into(),
        )
    })
}
