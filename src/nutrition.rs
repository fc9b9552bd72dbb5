//! Date-keyed nutrition diary with per-day macro totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::storage;

const DIARY_KEY: &str = "nutrition_diary";

type Diary = HashMap<String, Vec<FoodEntry>>;

/// One food logged on a diary day. Macro values are the entry's final
/// numbers; serving-size arithmetic happens before the entry is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub name: String,
    pub calories: f32,
    pub protein_g: f32,
    pub carbs_g: f32,
    pub fat_g: f32,
    #[serde(default)]
    pub serving: Option<String>,
}

impl FoodEntry {
    pub fn new(
        name: impl Into<String>,
        calories: f32,
        protein_g: f32,
        carbs_g: f32,
        fat_g: f32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            calories,
            protein_g,
            carbs_g,
            fat_g,
            serving: None,
        }
    }
}

/// Macro totals for one diary day.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMacros {
    pub calories: f32,
    pub protein_g: f32,
    pub carbs_g: f32,
    pub fat_g: f32,
}

fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Entries logged on `date`, in insertion order.
pub fn entries_on(date: NaiveDate) -> Vec<FoodEntry> {
    let mut diary: Diary = storage::read(DIARY_KEY);
    diary.remove(&day_key(date)).unwrap_or_default()
}

/// Add an entry to a diary day. Unnamed entries are rejected.
pub fn add_entry(date: NaiveDate, entry: FoodEntry) -> bool {
    if entry.name.trim().is_empty() {
        log::warn!("refusing to add unnamed food entry");
        return false;
    }
    match storage::update(DIARY_KEY, |diary: &mut Diary| {
        diary.entry(day_key(date)).or_default().push(entry)
    }) {
        Ok(()) => true,
        Err(e) => {
            log::error!("failed to save food entry: {e}");
            false
        }
    }
}

/// Remove one entry from a diary day; an emptied day disappears from the
/// diary entirely.
pub fn remove_entry(date: NaiveDate, id: Uuid) -> bool {
    match storage::update(DIARY_KEY, |diary: &mut Diary| {
        let key = day_key(date);
        let Some(list) = diary.get_mut(&key) else {
            return false;
        };
        let before = list.len();
        list.retain(|e| e.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            diary.remove(&key);
        }
        removed
    }) {
        Ok(removed) => removed,
        Err(e) => {
            log::error!("failed to remove food entry {id}: {e}");
            false
        }
    }
}

/// Sum calories and macros over a diary day.
pub fn totals_on(date: NaiveDate) -> DayMacros {
    let mut totals = DayMacros::default();
    for entry in entries_on(date) {
        totals.calories += entry.calories;
        totals.protein_g += entry.protein_g;
        totals.carbs_g += entry.carbs_g;
        totals.fat_g += entry.fat_g;
    }
    totals
}
