//! Tracker configuration.
//!
//! Loaded from a TOML file; every field has a default so partial files work.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::models::category::{default_categories, TimeSlotCategory};
use crate::utils::grid::DEFAULT_GRID_MINUTES;
use crate::utils::time::DAY_MINUTES;

/// What a create gesture released without movement produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ClickCreatePolicy {
    /// Commit nothing.
    #[default]
    Ignore,
    /// Fail as a zero-length interval.
    Reject,
    /// Grow to the minimum duration from the anchor.
    ExpandToMinimum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TimeTrackerConfig {
    pub default_category_id: String,
    /// Shortest slot a create commit accepts, in minutes
    pub min_slot_duration: i32,
    /// Longest slot a create commit accepts, in minutes
    pub max_slot_duration: i32,
    pub grid_size: i32,
    pub click_create: ClickCreatePolicy,
    /// Apply min/max duration to move and resize commits too
    pub enforce_duration_on_edit: bool,
    /// Height of the grab zone at each slot edge, in pixels
    pub edge_handle_px: f32,
    pub categories: Vec<TimeSlotCategory>,
}

impl Default for TimeTrackerConfig {
    fn default() -> Self {
        Self {
            default_category_id: "study".to_string(),
            min_slot_duration: 15,
            max_slot_duration: 480,
            grid_size: DEFAULT_GRID_MINUTES,
            click_create: ClickCreatePolicy::Ignore,
            enforce_duration_on_edit: false,
            edge_handle_px: 6.0,
            categories: default_categories(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "Ken24T", "DayTimeline").context("Could not determine config directory")
}

impl TimeTrackerConfig {
    /// Load from the platform config directory, falling back to defaults
    /// when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Default location of the slot database.
    pub fn database_path() -> Result<PathBuf> {
        let data_dir = project_dirs()?.data_dir().to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        Ok(data_dir.join("slots.db"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size <= 0 || self.grid_size > DAY_MINUTES {
            return Err(anyhow!("grid-size must be between 1 and {}", DAY_MINUTES));
        }
        if self.min_slot_duration <= 0 {
            return Err(anyhow!("min-slot-duration must be positive"));
        }
        if self.min_slot_duration > self.max_slot_duration {
            return Err(anyhow!(
                "min-slot-duration ({}) exceeds max-slot-duration ({})",
                self.min_slot_duration,
                self.max_slot_duration
            ));
        }
        if self.edge_handle_px < 0.0 {
            return Err(anyhow!("edge-handle-px cannot be negative"));
        }
        for category in &self.categories {
            category
                .validate()
                .map_err(|e| anyhow!("Category '{}': {}", category.id, e))?;
        }
        if !self.categories.is_empty() && self.category(&self.default_category_id).is_none() {
            return Err(anyhow!(
                "default-category-id '{}' is not a configured category",
                self.default_category_id
            ));
        }
        Ok(())
    }

    pub fn category(&self, id: &str) -> Option<&TimeSlotCategory> {
        self.categories.iter().find(|cat| cat.id == id)
    }
}
