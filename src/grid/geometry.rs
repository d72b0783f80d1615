//! Time/pixel geometry for the scheduling grid.
//!
//! One linear scale maps clock minutes to vertical pixels. Resting
//! appointment blocks, live drag feedback and the now-indicator all go
//! through these functions so a block never jumps when a drag starts.

/// Minimum rendered block height in pixels. Very short appointments
/// stay visible and clickable even though their proportional height
/// would be smaller.
pub const MIN_BLOCK_HEIGHT: f32 = 24.0;

/// Convert clock minutes (relative to the grid's top edge) to a vertical
/// pixel offset, rounded to the nearest whole pixel.
pub fn time_to_offset(clock_minutes: f32, cell_height: f32) -> f32 {
    (clock_minutes / 60.0 * cell_height).round()
}

/// Convert a vertical pixel delta to a minute delta.
pub fn offset_to_minutes_delta(pixel_delta: f32, cell_height: f32) -> f32 {
    pixel_delta * (60.0 / cell_height)
}

/// Convert a duration to a rendered block height, floored at
/// [`MIN_BLOCK_HEIGHT`].
pub fn duration_to_height(duration_minutes: f32, cell_height: f32) -> f32 {
    (duration_minutes / 60.0 * cell_height).round().max(MIN_BLOCK_HEIGHT)
}
