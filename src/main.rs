// Day Timeline
// Command line entry point: inspect and edit one day of slots

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use clap::{Parser, Subcommand};

use day_timeline::models::category::{category_name, slot_color};
use day_timeline::models::config::TimeTrackerConfig;
use day_timeline::models::slot::{SlotId, TimeSlot};
use day_timeline::services::collection::DaySlots;
use day_timeline::services::store::{
    export_day_to_file, import_day_from_file, SlotStore, SqliteSlotStore,
};
use day_timeline::services::validation::ValidationRules;
use day_timeline::utils::time::{clock_to_minutes, format_duration};

#[derive(Parser)]
#[command(name = "day-timeline")]
#[command(about = "Inspect and edit the time slots of a day")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Slot database (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the slots of a day and per-category totals
    Show {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Print per-day and per-category totals for the week (Monday to
    /// Sunday) containing a date
    Week {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Add a slot
    Add {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        /// Start time (HH:MM)
        start: String,
        /// End time (HH:MM, 24:00 for midnight)
        end: String,
        /// Category id (defaults to the configured default)
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Remove a slot by id
    Remove {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        id: String,
    },
    /// Remove every slot of a day
    Clear {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Write a day to a JSON file
    Export {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        path: PathBuf,
    },
    /// Replace a day with the slots in a JSON file
    Import {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        path: PathBuf,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", value))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TimeTrackerConfig::load_from(path)?,
        None => TimeTrackerConfig::load()?,
    };
    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => TimeTrackerConfig::database_path()?,
    };
    let db_path = db_path
        .to_str()
        .ok_or_else(|| anyhow!("Database path is not valid UTF-8"))?
        .to_string();
    let mut store = SqliteSlotStore::new(&db_path)?;

    match cli.command {
        Commands::Show { date } => {
            let day = load_day(&store, date)?;
            print!("{}", day_report(&day, &config));
        }
        Commands::Week { date } => {
            let week = load_week(&store, date)?;
            print!("{}", week_report(&week, &config));
        }
        Commands::Add {
            date,
            start,
            end,
            category,
            title,
        } => {
            let mut day = load_day(&store, date)?;
            let slot = build_slot(date, &start, &end, category, title, &config)?;
            // Same rules as a create gesture
            day.insert(slot.clone(), ValidationRules::for_create(&config))?;
            store.save(&slot)?;
            println!("Added {} {}", slot.id, slot.time_range_label());
        }
        Commands::Remove { date, id } => {
            let id = SlotId::parse(&id).ok_or_else(|| anyhow!("'{}' is not a slot id", id))?;
            let day = load_day(&store, date)?;
            let slot = day
                .get(id)
                .ok_or_else(|| anyhow!("No slot {} on {}", id, date))?;
            store.delete(id)?;
            println!("Removed {}", slot.time_range_label());
        }
        Commands::Clear { date } => {
            let removed = store.delete_by_date(date)?;
            println!("Removed {} slots from {}", removed, date);
        }
        Commands::Export { date, path } => {
            let day = load_day(&store, date)?;
            export_day_to_file(&day, &path)?;
            println!("Exported {} slots to {}", day.len(), path.display());
        }
        Commands::Import { date, path } => {
            let day = import_day_from_file(date, &path)?;
            let removed = store.replace_day(&day)?;
            println!(
                "Imported {} slots into {} (replaced {})",
                day.len(),
                date,
                removed
            );
        }
    }

    Ok(())
}

fn load_day(store: &impl SlotStore, date: NaiveDate) -> Result<DaySlots> {
    let slots = store.list_by_date(date)?;
    DaySlots::from_slots(date, slots).with_context(|| format!("Stored slots for {} overlap", date))
}

/// The seven days from the Monday on or before `date`.
fn load_week(store: &impl SlotStore, date: NaiveDate) -> Result<Vec<DaySlots>> {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    let sunday = monday + Duration::days(6);
    let slots = store.list_by_range(monday, sunday)?;

    (0..7)
        .map(|offset| {
            let day = monday + Duration::days(offset);
            let slots = slots.iter().filter(|slot| slot.date == day).cloned();
            DaySlots::from_slots(day, slots)
                .with_context(|| format!("Stored slots for {} overlap", day))
        })
        .collect()
}

fn build_slot(
    date: NaiveDate,
    start: &str,
    end: &str,
    category: Option<String>,
    title: Option<String>,
    config: &TimeTrackerConfig,
) -> Result<TimeSlot> {
    let start = clock_to_minutes(start).ok_or_else(|| anyhow!("'{}' is not HH:MM", start))?;
    let end = clock_to_minutes(end).ok_or_else(|| anyhow!("'{}' is not HH:MM", end))?;
    let category = category.unwrap_or_else(|| config.default_category_id.clone());
    if !config.categories.is_empty() && config.category(&category).is_none() {
        return Err(anyhow!("Unknown category '{}'", category));
    }

    let mut builder = TimeSlot::builder()
        .date(date)
        .start_time(start)
        .end_time(end)
        .category(category);
    if let Some(title) = title {
        builder = builder.title(title);
    }
    Ok(builder.build()?)
}

fn day_report(day: &DaySlots, config: &TimeTrackerConfig) -> String {
    let mut out = format!("{}\n", day.date().format("%A %Y-%m-%d"));
    if day.is_empty() {
        out.push_str("  no slots\n");
        return out;
    }

    for slot in day {
        let name = category_name(&slot.category_id, &config.categories);
        out.push_str(&format!(
            "  {}  {:>7}  {}  {}",
            slot.time_range_label(),
            format_duration(slot.duration()),
            slot_color(slot, &config.categories),
            name
        ));
        if let Some(title) = &slot.title {
            out.push_str(&format!(" - {}", title));
        }
        out.push('\n');
    }

    push_totals(
        &mut out,
        day.minutes_by_category(),
        day.total_minutes(),
        day.tracked_minutes(&config.categories),
        config,
    );
    out
}

fn week_report(week: &[DaySlots], config: &TimeTrackerConfig) -> String {
    let (Some(first), Some(last)) = (week.first(), week.last()) else {
        return String::new();
    };
    let mut out = format!(
        "Week {} to {}\n",
        first.date().format("%Y-%m-%d"),
        last.date().format("%Y-%m-%d")
    );

    let mut by_category: BTreeMap<&str, i32> = BTreeMap::new();
    for day in week {
        out.push_str(&format!(
            "  {}  {:>7}  {} slots\n",
            day.date().format("%a %m-%d"),
            format_duration(day.total_minutes()),
            day.len()
        ));
        for (category_id, minutes) in day.minutes_by_category() {
            *by_category.entry(category_id).or_insert(0) += minutes;
        }
    }

    push_totals(
        &mut out,
        by_category,
        week.iter().map(DaySlots::total_minutes).sum(),
        week.iter().map(|day| day.tracked_minutes(&config.categories)).sum(),
        config,
    );
    out
}

fn push_totals(
    out: &mut String,
    by_category: BTreeMap<&str, i32>,
    total: i32,
    tracked: i32,
    config: &TimeTrackerConfig,
) {
    out.push_str("Totals\n");
    for (category_id, minutes) in by_category {
        out.push_str(&format!(
            "  {:<20} {:>7}\n",
            category_name(category_id, &config.categories),
            format_duration(minutes)
        ));
    }
    out.push_str(&format!("  {:<20} {:>7}\n", "total", format_duration(total)));
    out.push_str(&format!("  {:<20} {:>7}\n", "tracked", format_duration(tracked)));
}
