//! Nicotine-use tracking: entries, settings and daily totals.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage;

const ENTRIES_KEY: &str = "nicotine_entries";
const SETTINGS_KEY: &str = "nicotine_settings";

/// One logged dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicotineEntry {
    pub id: Uuid,
    pub amount_mg: f32,
    pub timestamp: DateTime<Utc>,
}

impl NicotineEntry {
    pub fn new(amount_mg: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount_mg,
            timestamp: Utc::now(),
        }
    }

    /// Local calendar day the entry falls on.
    pub fn local_day(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingMode {
    /// Log without judgement.
    Monitor,
    /// Log against a daily goal.
    Reduce,
    /// Goal is zero; any use counts against it.
    Quit,
}

impl Default for TrackingMode {
    fn default() -> Self {
        TrackingMode::Monitor
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NicotineSettings {
    pub mode: TrackingMode,
    pub daily_goal_mg: Option<f32>,
    pub default_dose_mg: f32,
}

impl Default for NicotineSettings {
    fn default() -> Self {
        Self {
            mode: TrackingMode::Monitor,
            daily_goal_mg: None,
            default_dose_mg: 2.0,
        }
    }
}

pub fn settings() -> NicotineSettings {
    storage::read(SETTINGS_KEY)
}

pub fn save_settings(settings: &NicotineSettings) -> bool {
    match storage::write(SETTINGS_KEY, settings) {
        Ok(()) => true,
        Err(e) => {
            log::error!("failed to save nicotine settings: {e}");
            false
        }
    }
}

/// All entries in insertion order.
pub fn entries() -> Vec<NicotineEntry> {
    storage::read(ENTRIES_KEY)
}

pub fn add_entry(entry: NicotineEntry) -> bool {
    match storage::update(ENTRIES_KEY, |list: &mut Vec<NicotineEntry>| list.push(entry)) {
        Ok(()) => true,
        Err(e) => {
            log::error!("failed to save nicotine entry: {e}");
            false
        }
    }
}

pub fn delete_entry(id: Uuid) -> bool {
    match storage::update(ENTRIES_KEY, |list: &mut Vec<NicotineEntry>| {
        let before = list.len();
        list.retain(|e| e.id != id);
        list.len() != before
    }) {
        Ok(removed) => removed,
        Err(e) => {
            log::error!("failed to delete nicotine entry {id}: {e}");
            false
        }
    }
}

/// Log a dose right now. Without an explicit amount the configured default
/// dose is used. Returns the stored entry.
pub fn log_use(amount_mg: Option<f32>) -> Option<NicotineEntry> {
    let amount = amount_mg.unwrap_or_else(|| settings().default_dose_mg);
    let entry = NicotineEntry::new(amount);
    add_entry(entry.clone()).then_some(entry)
}

pub fn entries_on(date: NaiveDate) -> Vec<NicotineEntry> {
    entries()
        .into_iter()
        .filter(|e| e.local_day() == date)
        .collect()
}

/// Total milligrams logged on a local calendar day.
pub fn total_on(date: NaiveDate) -> f32 {
    entries_on(date).iter().map(|e| e.amount_mg).sum()
}

/// Fraction of the daily goal consumed on `date`; `None` when no positive
/// goal is configured.
pub fn goal_progress(date: NaiveDate) -> Option<f32> {
    let goal = settings().daily_goal_mg?;
    if goal <= 0.0 {
        return None;
    }
    Some(total_on(date) / goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testutil;
    use chrono::TimeZone;

    fn entry_at(amount_mg: f32, ts: DateTime<Utc>) -> NicotineEntry {
        NicotineEntry {
            id: Uuid::new_v4(),
            amount_mg,
            timestamp: ts,
        }
    }

    #[test]
    fn settings_roundtrip_with_defaults() {
        let _store = testutil::temp_store();

        let loaded = settings();
        assert_eq!(loaded, NicotineSettings::default());
        assert_eq!(loaded.mode, TrackingMode::Monitor);

        let updated = NicotineSettings {
            mode: TrackingMode::Reduce,
            daily_goal_mg: Some(8.0),
            default_dose_mg: 4.0,
        };
        assert!(save_settings(&updated));
        assert_eq!(settings(), updated);
    }

    #[test]
    fn log_use_falls_back_to_default_dose() {
        let _store = testutil::temp_store();

        let logged = log_use(None).unwrap();
        assert!((logged.amount_mg - 2.0).abs() < 1e-6);

        let explicit = log_use(Some(6.0)).unwrap();
        assert!((explicit.amount_mg - 6.0).abs() < 1e-6);

        assert_eq!(entries().len(), 2);
    }

    #[test]
    fn delete_entry_removes_exactly_one() {
        let _store = testutil::temp_store();
        let first = log_use(Some(2.0)).unwrap();
        let second = log_use(Some(4.0)).unwrap();

        assert!(delete_entry(first.id));
        let left = entries();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, second.id);
        assert!(!delete_entry(first.id));
    }

    #[test]
    fn daily_totals_group_by_local_day() {
        let _store = testutil::temp_store();

        // Build timestamps from local wall-clock times so the grouping is
        // exercised regardless of the host timezone.
        let morning = entry_at(
            4.0,
            Local
                .with_ymd_and_hms(2026, 8, 1, 8, 0, 0)
                .unwrap()
                .with_timezone(&Utc),
        );
        let evening = entry_at(
            2.0,
            Local
                .with_ymd_and_hms(2026, 8, 1, 20, 0, 0)
                .unwrap()
                .with_timezone(&Utc),
        );
        let next_day = entry_at(
            6.0,
            Local
                .with_ymd_and_hms(2026, 8, 3, 12, 0, 0)
                .unwrap()
                .with_timezone(&Utc),
        );
        assert!(add_entry(morning));
        assert!(add_entry(evening));
        assert!(add_entry(next_day));

        let day = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let other_day = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        assert_eq!(entries_on(day).len(), 2);
        assert!((total_on(day) - 6.0).abs() < 1e-6);
        assert!((total_on(other_day) - 6.0).abs() < 1e-6);
    }

    #[test]
    fn goal_progress_requires_a_goal() {
        let _store = testutil::temp_store();

        let entry = entry_at(4.0, Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap());
        let day = entry.local_day();
        assert!(add_entry(entry));

        assert!(goal_progress(day).is_none());

        let mut s = NicotineSettings::default();
        s.mode = TrackingMode::Reduce;
        s.daily_goal_mg = Some(8.0);
        assert!(save_settings(&s));
        assert!((goal_progress(day).unwrap() - 0.5).abs() < 1e-6);

        // A zero goal (quit mode) never divides.
        s.mode = TrackingMode::Quit;
        s.daily_goal_mg = Some(0.0);
        assert!(save_settings(&s));
        assert!(goal_progress(day).is_none());
    }
}
