// Test fixtures - reusable test data
// Provides consistent days and slots across all test files

#![allow(dead_code)]

use chrono::NaiveDate;
use day_timeline::models::slot::TimeSlot;
use day_timeline::services::collection::DaySlots;

/// One pixel per minute keeps pointer positions readable
pub const AXIS: f32 = 1440.0;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Wednesday Jan 10, 2024
    pub fn jan_10_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    /// Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }
}

/// Sample days for testing
pub mod days {
    use super::*;

    pub fn slot(date: NaiveDate, start: i32, end: i32, category: &str) -> TimeSlot {
        TimeSlot::new(date, start, end, category).unwrap()
    }

    /// Work 09:00-10:00 and rest 14:00-15:00
    pub fn work_and_rest() -> DaySlots {
        let date = dates::jan_10_2024();
        DaySlots::from_slots(
            date,
            vec![slot(date, 540, 600, "work"), slot(date, 840, 900, "rest")],
        )
        .unwrap()
    }

    /// A full working day with touching slots
    pub fn packed_morning() -> DaySlots {
        let date = dates::jan_10_2024();
        DaySlots::from_slots(
            date,
            vec![
                slot(date, 420, 480, "exercise"),
                slot(date, 480, 510, "eat"),
                slot(date, 510, 540, "commuting"),
                slot(date, 540, 720, "work"),
            ],
        )
        .unwrap()
    }
}
