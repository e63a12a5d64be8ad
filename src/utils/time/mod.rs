//! Minute-offset conversions for the day axis.
//!
//! Slot edges are integer minutes from midnight. The day spans
//! `0..=DAY_MINUTES`, where `DAY_MINUTES` is the exclusive bound for a minute
//! and the inclusive bound for an end edge.

/// Minutes in one day. The single day ceiling used by every component.
pub const DAY_MINUTES: i32 = 1440;

/// Format a minute offset as `HH:MM` (zero-padded).
///
/// Input is clamped to the day, so `1440` renders as `24:00`.
pub fn minutes_to_clock(minutes: i32) -> String {
    let minutes = minutes.clamp(0, DAY_MINUTES);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse an `HH:MM` (or `H:MM`) clock string into a minute offset.
///
/// Returns `None` for text that is not two colon-separated numbers, or a
/// minute component of 60 or more. Hours past midnight clamp to the day
/// ceiling.
pub fn clock_to_minutes(clock: &str) -> Option<i32> {
    let (hours, minutes) = clock.trim().split_once(':')?;
    let hours: i32 = hours.trim().parse().ok()?;
    let minutes: i32 = minutes.trim().parse().ok()?;

    if hours < 0 || !(0..60).contains(&minutes) {
        return None;
    }

    Some((hours * 60 + minutes).min(DAY_MINUTES))
}

/// Project a minute offset onto an axis of `axis_length` pixels.
pub fn minutes_to_offset(minutes: i32, axis_length: f32) -> f32 {
    minutes as f32 / DAY_MINUTES as f32 * axis_length
}

/// Map a pointer offset back to the nearest whole minute.
///
/// Out-of-range offsets clamp to the day edges; a degenerate axis maps
/// everything to minute 0.
pub fn offset_to_minutes(offset: f32, axis_length: f32) -> i32 {
    if axis_length <= 0.0 || !offset.is_finite() {
        return 0;
    }
    let minutes = (offset / axis_length * DAY_MINUTES as f32).round();
    (minutes as i32).clamp(0, DAY_MINUTES)
}

/// Offset and length of an interval on an axis of `axis_length` pixels.
pub fn slot_extent(start: i32, end: i32, axis_length: f32) -> (f32, f32) {
    let offset = minutes_to_offset(start, axis_length);
    let length = minutes_to_offset(end - start, axis_length);
    (offset, length)
}

/// Human-readable duration such as `1h 30m`, `2h` or `45m`.
pub fn format_duration(minutes: i32) -> String {
    let minutes = minutes.max(0);
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// `HH:MM - HH:MM` label for an interval.
pub fn format_range(start: i32, end: i32) -> String {
    format!("{} - {}", minutes_to_clock(start), minutes_to_clock(end))
}
