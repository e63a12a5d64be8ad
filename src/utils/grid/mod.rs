// Grid snapping for slot edges

/// Default snapping increment in minutes.
pub const DEFAULT_GRID_MINUTES: i32 = 15;

/// Round `minutes` to the nearest multiple of `grid`, ties rounding up.
///
/// The result is not clamped to the day; callers clamp separately.
/// A non-positive grid disables snapping. Results past the `i32` range
/// saturate.
pub fn snap(minutes: i32, grid: i32) -> i32 {
    if grid <= 0 {
        return minutes;
    }
    let (minutes, grid) = (i64::from(minutes), i64::from(grid));
    // floor((2m + g) / 2g) == round-half-up of m / g
    let snapped = (2 * minutes + grid).div_euclid(2 * grid) * grid;
    snapped.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
