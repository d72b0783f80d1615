// Appointment model
// A booked service slot for one staff member on one calendar day

use chrono::{DateTime, Local};

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Booked,
    Confirmed,
    Completed,
    Canceled,
    NoShow,
}

impl AppointmentStatus {
    /// Stable string form used by the database layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::NoShow => "no_show",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "booked" => Some(AppointmentStatus::Booked),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "completed" => Some(AppointmentStatus::Completed),
            "canceled" => Some(AppointmentStatus::Canceled),
            "no_show" => Some(AppointmentStatus::NoShow),
            _ => None,
        }
    }

    /// Terminal statuses cannot be rescheduled by dragging.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Canceled | AppointmentStatus::Completed
        )
    }

    /// Whether an appointment in this status still occupies its slot
    /// for conflict purposes. Canceled bookings free their time.
    pub fn blocks_time(&self) -> bool {
        !matches!(self, AppointmentStatus::Canceled)
    }
}

/// A customer appointment with one staff member.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: Option<i64>,
    pub staff_id: i64,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub status: AppointmentStatus,
    pub customer_name: Option<String>,
    pub service_name: Option<String>,
    pub paid: bool,
    pub invoiced: bool,
    pub created_at: Option<DateTime<Local>>,
    pub updated_at: Option<DateTime<Local>>,
}

impl Appointment {
    /// Create a new appointment with required fields.
    ///
    /// # Examples
    /// ```
    /// use salon_scheduler::models::appointment::Appointment;
    /// use chrono::Local;
    ///
    /// let start = Local::now();
    /// let end = start + chrono::Duration::minutes(30);
    /// let appointment = Appointment::new(1, start, end).unwrap();
    /// ```
    pub fn new(
        staff_id: i64,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Self, String> {
        let appointment = Self {
            id: None,
            staff_id,
            start,
            end,
            status: AppointmentStatus::Booked,
            customer_name: None,
            service_name: None,
            paid: false,
            invoiced: false,
            created_at: None,
            updated_at: None,
        };
        appointment.validate()?;
        Ok(appointment)
    }

    /// Create a builder for constructing appointments with optional fields.
    pub fn builder() -> AppointmentBuilder {
        AppointmentBuilder::new()
    }

    /// Validate the appointment.
    pub fn validate(&self) -> Result<(), String> {
        if self.end <= self.start {
            return Err("Appointment end time must be after start time".to_string());
        }
        if self.start.date_naive() != self.end.date_naive() {
            return Err("Appointment must start and end on the same day".to_string());
        }
        Ok(())
    }

    /// Get the duration of the appointment.
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// Whether this appointment may open a drag session.
    pub fn is_draggable(&self) -> bool {
        self.id.is_some() && !self.status.is_terminal()
    }
}

/// Builder for creating appointments with optional fields
pub struct AppointmentBuilder {
    staff_id: Option<i64>,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    status: AppointmentStatus,
    customer_name: Option<String>,
    service_name: Option<String>,
    paid: bool,
    invoiced: bool,
}

impl AppointmentBuilder {
    pub fn new() -> Self {
        Self {
            staff_id: None,
            start: None,
            end: None,
            status: AppointmentStatus::Booked,
            customer_name: None,
            service_name: None,
            paid: false,
            invoiced: false,
        }
    }

    pub fn staff_id(mut self, staff_id: i64) -> Self {
        self.staff_id = Some(staff_id);
        self
    }

    pub fn start(mut self, start: DateTime<Local>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime<Local>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    pub fn invoiced(mut self, invoiced: bool) -> Self {
        self.invoiced = invoiced;
        self
    }

    pub fn build(self) -> Result<Appointment, String> {
        let staff_id = self.staff_id.ok_or("Staff id is required")?;
        let start = self.start.ok_or("Start time is required")?;
        let end = self.end.ok_or("End time is required")?;

        let mut appointment = Appointment::new(staff_id, start, end)?;
        appointment.status = self.status;
        appointment.customer_name = self.customer_name;
        appointment.service_name = self.service_name;
        appointment.paid = self.paid;
        appointment.invoiced = self.invoiced;
        Ok(appointment)
    }
}

impl Default for AppointmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};

    #[test]
    fn test_new_appointment() {
        let start = Local::now();
        let appointment = Appointment::new(1, start, start + Duration::minutes(45)).unwrap();
        assert_eq!(appointment.staff_id, 1);
        assert_eq!(appointment.status, AppointmentStatus::Booked);
        assert!(appointment.id.is_none());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let start = Local::now();
        let result = Appointment::new(1, start, start - Duration::minutes(30));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let start = Local::now();
        assert!(Appointment::new(1, start, start).is_err());
    }

    #[test]
    fn test_builder_with_optional_fields() {
        let start = Local::now();
        let appointment = Appointment::builder()
            .staff_id(2)
            .start(start)
            .end(start + Duration::minutes(30))
            .customer_name("Dana")
            .service_name("Cut & Finish")
            .paid(true)
            .build()
            .unwrap();

        assert_eq!(appointment.customer_name.as_deref(), Some("Dana"));
        assert_eq!(appointment.service_name.as_deref(), Some("Cut & Finish"));
        assert!(appointment.paid);
        assert!(!appointment.invoiced);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            AppointmentStatus::Booked,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Canceled,
            AppointmentStatus::NoShow,
        ] {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AppointmentStatus::parse("tentative"), None);
    }

    #[test]
    fn test_terminal_statuses_not_draggable() {
        let start = Local::now();
        let mut appointment = Appointment::new(1, start, start + Duration::minutes(30)).unwrap();
        appointment.id = Some(7);
        assert!(appointment.is_draggable());

        appointment.status = AppointmentStatus::Canceled;
        assert!(!appointment.is_draggable());

        appointment.status = AppointmentStatus::Completed;
        assert!(!appointment.is_draggable());
    }

    #[test]
    fn test_canceled_does_not_block_time() {
        assert!(!AppointmentStatus::Canceled.blocks_time());
        assert!(AppointmentStatus::Completed.blocks_time());
        assert!(AppointmentStatus::NoShow.blocks_time());
    }
}
