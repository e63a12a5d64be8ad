// Property-based tests for the timeline invariants
// Random days and pointer paths must never break the no-overlap rule

use chrono::NaiveDate;
use day_timeline::models::config::TimeTrackerConfig;
use day_timeline::models::drag::{DragKind, ResizeEdge};
use day_timeline::models::slot::TimeSlot;
use day_timeline::services::boundary::{above_boundary, below_boundary};
use day_timeline::services::collection::DaySlots;
use day_timeline::services::interaction::{begin_operation, Commit, InteractionMachine};
use day_timeline::services::validation::{is_valid, ValidationRules};
use day_timeline::utils::grid::snap;
use day_timeline::utils::time::{minutes_to_offset, offset_to_minutes, DAY_MINUTES};
use proptest::prelude::*;

const AXIS: f32 = 960.0;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

/// Disjoint slots built from sorted random cut points.
fn arb_day() -> impl Strategy<Value = DaySlots> {
    prop::collection::btree_set(0..=DAY_MINUTES, 0..12).prop_map(|cuts| {
        let cuts: Vec<i32> = cuts.into_iter().collect();
        let slots = cuts
            .chunks_exact(2)
            .map(|pair| TimeSlot::new(date(), pair[0], pair[1], "work").unwrap());
        DaySlots::from_slots(date(), slots).unwrap()
    })
}

fn arb_kind() -> impl Strategy<Value = DragKind> {
    prop_oneof![
        Just(DragKind::Create),
        Just(DragKind::Move),
        Just(DragKind::Resize(ResizeEdge::Top)),
        Just(DragKind::Resize(ResizeEdge::Bottom)),
    ]
}

fn pairwise_disjoint(day: &DaySlots) -> bool {
    let slots = day.as_slice();
    slots.windows(2).all(|w| w[0].end_time <= w[1].start_time)
        && slots
            .iter()
            .all(|s| s.start_time >= 0 && s.end_time <= DAY_MINUTES && s.start_time < s.end_time)
}

proptest! {
    /// Property: pixel to minute conversion round-trips within a minute
    #[test]
    fn prop_offset_round_trip(minutes in 0..=DAY_MINUTES, axis in 100.0f32..4000.0) {
        let back = offset_to_minutes(minutes_to_offset(minutes, axis), axis);
        prop_assert!((back - minutes).abs() <= 1);
    }

    /// Property: snapping is idempotent
    #[test]
    fn prop_snap_idempotent(minutes in -3000..3000i32, grid in 1..120i32) {
        let once = snap(minutes, grid);
        prop_assert_eq!(snap(once, grid), once);
        prop_assert_eq!(once % grid, 0);
    }

    /// Property: any anchor minute starts a gesture inside the day
    #[test]
    fn prop_anchor_clamped_to_day(anchor in any::<i32>(), grid in 1..120i32) {
        let day = DaySlots::new(date());
        let op = begin_operation(DragKind::Create, 0.0, anchor, None, &day, grid).unwrap();
        prop_assert!(op.anchor_time >= 0 && op.anchor_time <= DAY_MINUTES);
        prop_assert_eq!(op.start, op.end);
    }

    /// Property: validity is exactly "in bounds, ordered and overlapping nothing"
    #[test]
    fn prop_is_valid_matches_overlap(day in arb_day(), start in -60..1500i32, len in -30..600i32) {
        let candidate = TimeSlot {
            start_time: start,
            end_time: start + len,
            ..TimeSlot::new(date(), 0, 15, "study").unwrap()
        };
        let expected = start >= 0
            && start + len <= DAY_MINUTES
            && len > 0
            && !day.iter().any(|other| candidate.overlaps(other));

        prop_assert_eq!(is_valid(&candidate, day.as_slice(), ValidationRules::structural()), expected);
    }

    /// Property: stretching a slot to its boundary never overlaps a neighbour
    #[test]
    fn prop_boundaries_never_overlap(day in arb_day()) {
        let slots = day.as_slice();
        for current in slots {
            if let Some(ceiling) = below_boundary(slots, current, None) {
                let stretched = current.with_times(current.start_time, ceiling);
                prop_assert!(is_valid(&stretched, slots, ValidationRules::structural()));
            }
            if let Some(floor) = above_boundary(slots, current, None) {
                let stretched = current.with_times(floor, current.end_time);
                prop_assert!(is_valid(&stretched, slots, ValidationRules::structural()));
            }
        }
    }

    /// Property: any gesture path keeps the transient inside the day and,
    /// once committed, keeps the day disjoint
    #[test]
    fn prop_gestures_preserve_invariants(
        mut day in arb_day(),
        kind in arb_kind(),
        pick in any::<prop::sample::Index>(),
        anchor in 0.0f32..AXIS,
        path in prop::collection::vec(-100.0f32..AXIS + 100.0, 1..8),
    ) {
        let config = TimeTrackerConfig::default();
        let mut machine = InteractionMachine::new(&config, AXIS);
        let slot = if day.is_empty() { None } else { Some(day.as_slice()[pick.index(day.len())].clone()) };
        let anchor_time = offset_to_minutes(anchor, AXIS);

        if machine.begin(kind, anchor, anchor_time, slot.as_ref(), &day).is_err() {
            prop_assume!(false);
        }

        for position in path {
            let transient = machine.update(position).unwrap();
            prop_assert!(transient.start_time >= 0);
            prop_assert!(transient.end_time <= DAY_MINUTES);
            prop_assert!(transient.start_time <= transient.end_time);
            if kind == DragKind::Move {
                let original = slot.as_ref().unwrap();
                prop_assert_eq!(transient.duration(), original.duration());
            }
        }

        match machine.commit(&day, &config) {
            Ok(Commit::Created(slot)) => day.insert(slot, ValidationRules::for_create(&config)).unwrap(),
            Ok(Commit::Updated(slot)) => {
                day.replace(slot, ValidationRules::for_edit(&config)).unwrap();
            }
            _ => {}
        }
        prop_assert!(pairwise_disjoint(&day));
    }
}
