//! Grid layout: the renderer-agnostic description of one day view.
//!
//! A pure, synchronous function of the board's state, callable on every
//! pointer-move tick. Output is rectangles and slot overlays; visual
//! embellishment (shadows, highlight colors) belongs to the host
//! rendering surface.

use chrono::NaiveTime;
use serde::Serialize;

use crate::grid::drag::{CandidateInterval, DragSession};
use crate::grid::geometry::{duration_to_height, time_to_offset};
use crate::grid::slots::{DayAvailability, SlotClass};
use crate::models::appointment::Appointment;
use crate::models::settings::GridSettings;
use crate::utils::time::{minutes_of, minutes_since_midnight};

/// One rendered appointment rectangle inside a staff column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentBlock {
    pub appointment_id: i64,
    /// Pixels from the top of the grid body.
    pub top: f32,
    pub height: f32,
    /// The block under the active drag session; hosts typically raise
    /// its z-order.
    pub dragging: bool,
}

/// One hour row overlay inside a staff column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourSlot {
    pub hour: u32,
    pub top: f32,
    pub class: SlotClass,
}

/// One staff member's column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffColumn {
    pub staff_id: i64,
    pub slots: Vec<HourSlot>,
    pub blocks: Vec<AppointmentBlock>,
}

/// The full day grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLayout {
    pub columns: Vec<StaffColumn>,
    /// Wall-clock indicator offset, when "now" falls inside the visible
    /// hour range. Positioned with the same mapper as the blocks so it
    /// stays pixel-consistent.
    pub now_marker: Option<f32>,
    pub grid_height: f32,
}

/// Lay out one day: per staff column the hour overlays and appointment
/// rectangles, with the dragged appointment following its live
/// candidate interval instead of its persisted one.
pub fn layout_day(
    staff_ids: &[i64],
    availability: impl Fn(i64) -> DayAvailability,
    appointments: &[Appointment],
    active_drag: Option<(&DragSession, &CandidateInterval)>,
    settings: &GridSettings,
    now: Option<NaiveTime>,
) -> GridLayout {
    let origin_minutes = settings.first_hour as i64 * 60;
    let cell = settings.cell_height_px;

    let columns = staff_ids
        .iter()
        .map(|&staff_id| {
            let day = availability(staff_id);
            let slots = (settings.first_hour..settings.last_hour)
                .map(|hour| HourSlot {
                    hour,
                    top: time_to_offset((hour as i64 * 60 - origin_minutes) as f32, cell),
                    class: day.classify(hour),
                })
                .collect();

            let blocks = appointments
                .iter()
                .filter(|a| a.staff_id == staff_id)
                .filter_map(|a| {
                    let id = a.id?;
                    let dragging = active_drag
                        .map_or(false, |(session, _)| session.appointment_id == id);
                    let (start, end) = match (dragging, active_drag) {
                        (true, Some((_, candidate))) => (candidate.start, candidate.end),
                        _ => (a.start, a.end),
                    };
                    let start_min = minutes_of(start);
                    let duration_min = minutes_of(end) - start_min;
                    Some(AppointmentBlock {
                        appointment_id: id,
                        top: time_to_offset((start_min - origin_minutes) as f32, cell),
                        height: duration_to_height(duration_min as f32, cell),
                        dragging,
                    })
                })
                .collect();

            StaffColumn {
                staff_id,
                slots,
                blocks,
            }
        })
        .collect();

    let now_marker = now.and_then(|time| {
        let minutes = minutes_since_midnight(time);
        let last = settings.last_hour as i64 * 60;
        if (origin_minutes..last).contains(&minutes) {
            Some(time_to_offset((minutes - origin_minutes) as f32, cell))
        } else {
            None
        }
    });

    GridLayout {
        columns,
        now_marker,
        grid_height: settings.visible_hours() as f32 * cell,
    }
}
