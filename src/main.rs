// Salon Scheduler
// Demo entry point: loads today's schedule and prints the grid layout

use anyhow::{Context, Result};
use chrono::Local;

use salon_scheduler::grid::ScheduleBoard;
use salon_scheduler::models::appointment::Appointment;
use salon_scheduler::models::settings::GridSettings;
use salon_scheduler::models::staff::Staff;
use salon_scheduler::services::appointment::AppointmentService;
use salon_scheduler::services::database::Database;
use salon_scheduler::services::hours::HoursService;
use salon_scheduler::services::staff::StaffService;
use salon_scheduler::utils::time::format_minutes;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Salon Scheduler");

    let db_path = database_path()?;
    let db = Database::new(&db_path)?;
    db.initialize_schema()?;

    let staff_service = StaffService::new(db.connection());
    if staff_service.list_active()?.is_empty() {
        seed_demo_data(&db)?;
    }

    let today = Local::now().date_naive();
    let settings = GridSettings::load();
    let mut board = ScheduleBoard::new(today, settings);

    let appointments = AppointmentService::new(db.connection());
    let hours = HoursService::new(db.connection());
    let availability = staff_service
        .list_active()?
        .into_iter()
        .filter_map(|s| s.id)
        .map(|id| hours.fetch_staff_hours(id, today))
        .collect::<Result<Vec<_>>>()?;
    board.load_day(&appointments, availability)?;

    let layout = board.layout(Some(Local::now().time()));
    for column in &layout.columns {
        let staff = staff_service.get(column.staff_id)?;
        let name = staff.map(|s| s.name).unwrap_or_else(|| "?".to_string());
        println!("{} (staff {})", name, column.staff_id);
        for block in &column.blocks {
            let appointment = board.appointment(block.appointment_id);
            let label = appointment
                .map(|a| {
                    format!(
                        "{}-{} {}",
                        a.start.format("%H:%M"),
                        a.end.format("%H:%M"),
                        a.customer_name.as_deref().unwrap_or("walk-in"),
                    )
                })
                .unwrap_or_default();
            println!("  [{:>4.0}px +{:>3.0}px] {}", block.top, block.height, label);
        }
    }
    if let Some(marker) = layout.now_marker {
        println!("now @ {:.0}px", marker);
    }
    let first = board.settings().first_hour as i64 * 60;
    let last = board.settings().last_hour as i64 * 60;
    log::debug!(
        "Grid covers {}..{} at {}px",
        format_minutes(first),
        format_minutes(last),
        layout.grid_height
    );

    Ok(())
}

fn database_path() -> Result<String> {
    let dirs = directories::ProjectDirs::from("", "", "salon-scheduler")
        .context("No home directory available")?;
    std::fs::create_dir_all(dirs.data_dir()).context("Failed to create data directory")?;
    let path = dirs.data_dir().join("salon.db");
    Ok(path.to_string_lossy().into_owned())
}

/// Seed one staff member and a couple of bookings so the demo prints
/// something on first launch.
fn seed_demo_data(db: &Database) -> Result<()> {
    log::info!("Seeding demo data");
    let staff = StaffService::new(db.connection())
        .create(Staff::new("Robin").map_err(anyhow::Error::msg)?)?;
    let staff_id = staff.id.context("Seeded staff has no id")?;

    let today = Local::now().date_naive();
    let appointments = AppointmentService::new(db.connection());
    for (start_min, end_min, customer, service) in [
        (600, 645, "Dana", "Cut & Finish"),
        (660, 720, "Sam", "Color"),
    ] {
        if let Some(start) = salon_scheduler::utils::time::local_at(today, start_min) {
            if let Some(end) = salon_scheduler::utils::time::local_at(today, end_min) {
                let appointment = Appointment::builder()
                    .staff_id(staff_id)
                    .start(start)
                    .end(end)
                    .customer_name(customer)
                    .service_name(service)
                    .build()
                    .map_err(anyhow::Error::msg)?;
                appointments.create(appointment)?;
            }
        }
    }
    Ok(())
}
