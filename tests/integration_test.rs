// Integration tests for gestures, validation and persistence working together

mod fixtures;

use day_timeline::models::config::{ClickCreatePolicy, TimeTrackerConfig};
use day_timeline::models::drag::{DragKind, ResizeEdge};
use day_timeline::models::slot::TimeSlot;
use day_timeline::services::boundary::below_boundary;
use day_timeline::services::collection::DaySlots;
use day_timeline::services::interaction::{Commit, InteractionMachine};
use day_timeline::services::session::{DaySession, PointerTarget};
use day_timeline::services::store::{export_day_json, SlotStore, SqliteSlotStore};
use day_timeline::services::validation::{validate, ValidationError, ValidationRules};
use fixtures::{dates, days, AXIS};
use pretty_assertions::assert_eq;

fn drag(
    day: &DaySlots,
    config: &TimeTrackerConfig,
    kind: DragKind,
    from: f32,
    to: f32,
    slot: Option<&TimeSlot>,
) -> Result<Commit, ValidationError> {
    let mut machine = InteractionMachine::new(config, AXIS);
    machine
        .begin(kind, from, from as i32, slot, day)
        .expect("gesture should start");
    machine.update(to);
    machine.commit(day, config)
}

#[test]
fn test_create_in_gap_succeeds() {
    let day = days::work_and_rest();
    let config = TimeTrackerConfig::default();

    let commit = drag(&day, &config, DragKind::Create, 600.0, 660.0, None).unwrap();
    let slot = commit.slot().unwrap();
    assert_eq!(slot.time_range_label(), "10:00 - 11:00");
}

#[test]
fn test_create_across_existing_slot_overlaps() {
    let day = days::work_and_rest();
    let config = TimeTrackerConfig::default();
    let work = day.as_slice()[0].id;

    let result = drag(&day, &config, DragKind::Create, 570.0, 630.0, None);
    assert_eq!(
        result,
        Err(ValidationError::Overlap {
            conflicting: work,
            start: 540,
            end: 600,
        })
    );

    let candidate = days::slot(dates::jan_10_2024(), 570, 630, "study");
    assert!(validate(&candidate, day.as_slice(), ValidationRules::structural()).is_err());
}

#[test]
fn test_resize_clamps_at_below_boundary() {
    let day = days::work_and_rest();
    let config = TimeTrackerConfig::default();
    let work = day.as_slice()[0].clone();

    let commit = drag(
        &day,
        &config,
        DragKind::Resize(ResizeEdge::Bottom),
        600.0,
        960.0,
        Some(&work),
    )
    .unwrap();

    let resized = commit.slot().unwrap();
    assert_eq!(resized.end_time, 840);
    assert_eq!(Some(resized.end_time), below_boundary(day.as_slice(), &work, None));
}

#[test]
fn test_create_dragged_backwards() {
    let day = DaySlots::new(dates::jan_10_2024());
    let config = TimeTrackerConfig::default();

    let commit = drag(&day, &config, DragKind::Create, 480.0, 420.0, None).unwrap();
    let slot = commit.slot().unwrap();
    assert_eq!((slot.start_time, slot.end_time), (420, 480));
}

#[test]
fn test_cancel_leaves_day_identical() {
    let day = days::work_and_rest();
    let config = TimeTrackerConfig::default();
    let json_before = export_day_json(&day).unwrap();
    let snapshot = day.clone();
    let rest = day.as_slice()[1].clone();

    let mut machine = InteractionMachine::new(&config, AXIS);
    machine
        .begin(DragKind::Move, 870.0, 870, Some(&rest), &day)
        .unwrap();
    machine.update(900.0);
    machine.update(1000.0);
    machine.update(640.0);
    machine.cancel();

    assert_eq!(day, snapshot);
    assert_eq!(export_day_json(&day).unwrap(), json_before);
}

#[test]
fn test_boxed_in_slot_cannot_move() {
    let day = days::packed_morning();
    let config = TimeTrackerConfig::default();
    let commuting = day.as_slice()[2].clone();

    let commit = drag(&day, &config, DragKind::Move, 525.0, 700.0, Some(&commuting)).unwrap();
    assert_eq!(commit, Commit::Unchanged(commuting));
}

#[test]
fn test_expand_click_at_day_end_grows_upward() {
    let day = DaySlots::new(dates::leap_day_2024());
    let config = TimeTrackerConfig {
        click_create: ClickCreatePolicy::ExpandToMinimum,
        ..TimeTrackerConfig::default()
    };

    let commit = drag(&day, &config, DragKind::Create, 1380.0, 1380.0, None).unwrap();
    assert_eq!(commit.slot().map(|s| s.end_time), Some(1395));

    let commit = drag(&day, &config, DragKind::Create, 1440.0, 1440.0, None).unwrap();
    let slot = commit.slot().unwrap();
    assert_eq!((slot.start_time, slot.end_time), (1425, 1440));
    assert_eq!(slot.time_range_label(), "23:45 - 24:00");
}

#[test]
fn test_session_persists_across_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("slots.db");
    let db_path = db_path.to_str().unwrap();
    let date = dates::jan_10_2024();

    {
        let store = SqliteSlotStore::new(db_path).unwrap();
        let mut session =
            DaySession::load(store, TimeTrackerConfig::default(), date, AXIS).unwrap();

        session.pointer_down(600.0).unwrap();
        session.pointer_move(690.0);
        let commit = session.pointer_up().unwrap();
        assert!(commit.is_persisted());

        // Drag the new slot's body down an hour
        assert!(matches!(session.hit_test(640.0), PointerTarget::Body(_)));
        session.pointer_down(640.0).unwrap();
        session.pointer_move(700.0);
        assert!(session.pointer_up().unwrap().is_persisted());
    }

    let store = SqliteSlotStore::new(db_path).unwrap();
    let slots = store.list_by_date(date).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!((slots[0].start_time, slots[0].end_time), (660, 750));
    assert_eq!(slots[0].category_id, "study");
}

#[test]
fn test_config_file_drives_session() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "default-category-id = \"work\"\ngrid-size = 30\nmin-slot-duration = 30\n",
    )
    .unwrap();
    let config = TimeTrackerConfig::load_from(&config_path).unwrap();

    let store = SqliteSlotStore::new(":memory:").unwrap();
    let mut session = DaySession::load(store, config, dates::jan_10_2024(), AXIS).unwrap();

    session.pointer_down(545.0).unwrap();
    let transient = session.pointer_move(610.0).unwrap();
    assert_eq!((transient.start_time, transient.end_time), (540, 600));

    let commit = session.pointer_up().unwrap();
    assert_eq!(commit.outcome.slot().map(|s| s.category_id.as_str()), Some("work"));
}

#[test]
fn test_half_axis_session() {
    let store = SqliteSlotStore::new(":memory:").unwrap();
    let mut session =
        DaySession::load(store, TimeTrackerConfig::default(), dates::jan_10_2024(), 720.0)
            .unwrap();

    // Two minutes per pixel
    session.pointer_down(300.0).unwrap();
    let transient = session.pointer_move(330.0).unwrap();
    assert_eq!((transient.start_time, transient.end_time), (600, 660));

    session.pointer_up().unwrap();
    assert!(matches!(session.hit_test(315.0), PointerTarget::Body(_)));
}
