//! Local data layer for a workout, nutrition and nicotine tracker.
//!
//! Everything is persisted as JSON blobs under fixed string keys in the
//! platform data directory; see [`storage`]. The nested
//! [`Workout`] → [`Exercise`] → [`ExerciseSet`] model mirrors what the
//! tracking screens edit, and [`analysis`] flattens it for statistics.

use chrono::{DateTime, Utc};
use dirs_next as dirs;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod analysis;
pub mod catalog;
pub mod export;
pub mod nicotine;
pub mod nutrition;
pub mod report;
pub mod session;
pub mod storage;
pub mod templates;
pub mod workouts;

/// Unit a workout's weights are entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightUnit {
    Lbs,
    Kg,
}

impl Default for WeightUnit {
    fn default() -> Self {
        WeightUnit::Lbs
    }
}

impl WeightUnit {
    /// Conversion factor applied to a value in pounds to express it in this
    /// unit.
    pub fn factor(self) -> f32 {
        match self {
            WeightUnit::Lbs => 1.0,
            WeightUnit::Kg => 0.453_592,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }
}

/// Convert `value` from one weight unit to another.
pub fn convert_weight(value: f32, from: WeightUnit, to: WeightUnit) -> f32 {
    value / from.factor() * to.factor()
}

static WEIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*([0-9]+(?:[.,][0-9]+)?)\s*(kgs?|lbs?)?\s*$").unwrap());

/// Parse a raw weight input string as typed on a set form.
///
/// Accepts plain numbers (`"135"`, `"60.5"`, `"62,5"`) and an optional
/// `kg`/`lb` suffix (`"60 kg"`, `"135lbs"`). Returns the numeric value and
/// the explicit unit, if one was given.
pub fn parse_weight(input: &str) -> Option<(f32, Option<WeightUnit>)> {
    let caps = WEIGHT_RE.captures(input)?;
    let value: f32 = caps[1].replace(',', ".").parse().ok()?;
    let unit = caps.get(2).map(|m| {
        if m.as_str().to_ascii_lowercase().starts_with("kg") {
            WeightUnit::Kg
        } else {
            WeightUnit::Lbs
        }
    });
    Some((value, unit))
}

/// One repetition group within an exercise.
///
/// `reps` and `weight` hold the raw form-input strings; statistics parse
/// them tolerantly and skip sets that do not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub id: Uuid,
    pub reps: String,
    pub weight: String,
    #[serde(default)]
    pub completed: bool,
}

impl ExerciseSet {
    pub fn new(reps: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            reps: reps.into(),
            weight: weight.into(),
            completed: false,
        }
    }

    pub fn parsed_reps(&self) -> Option<u32> {
        self.reps.trim().parse().ok()
    }

    /// Weight of this set expressed in `unit`.
    ///
    /// Strings without an explicit suffix are interpreted in `default_unit`
    /// (the owning workout's unit). An empty weight counts as bodyweight.
    pub fn weight_in(&self, default_unit: WeightUnit, unit: WeightUnit) -> Option<f32> {
        if self.weight.trim().is_empty() {
            return Some(0.0);
        }
        let (value, suffix) = parse_weight(&self.weight)?;
        Some(convert_weight(value, suffix.unwrap_or(default_unit), unit))
    }
}

/// A named exercise and its ordered sets. Only exists nested inside a
/// workout, template or active session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub sets: Vec<ExerciseSet>,
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sets: Vec::new(),
        }
    }
}

/// A logged exercise session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    /// Calendar day of the session, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    pub exercises: Vec<Exercise>,
}

impl Workout {
    pub fn new(date: impl Into<String>, weight_unit: WeightUnit) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: date.into(),
            start_time: None,
            duration_secs: None,
            weight_unit,
            exercises: Vec::new(),
        }
    }
}

/// Persistent app-level preferences.
///
/// Serialized to a JSON file in the platform config directory so choices
/// like the display unit survive restarts. Missing fields fall back to
/// their defaults via `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default)]
    pub one_rm_formula: analysis::OneRmFormula,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::Lbs,
            one_rm_formula: analysis::OneRmFormula::Brzycki,
        }
    }
}

impl Preferences {
    const FILE: &'static str = "fitlog_settings.json";

    fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Load preferences, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                if let Ok(prefs) = serde_json::from_str(&data) {
                    return prefs;
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match serde_json::to_string_pretty(self) {
                Ok(data) => {
                    if let Err(e) = std::fs::write(&path, data) {
                        log::warn!("failed to write preferences: {e}");
                    }
                }
                Err(e) => log::warn!("failed to serialize preferences: {e}"),
            }
        }
    }
}
