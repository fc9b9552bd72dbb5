//! Built-in exercise catalog and the persisted exercise-name history.
//!
//! The history backs the log-exercise autocomplete: names the user has
//! actually logged rank ahead of the built-in table, most recent first.

use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strsim::jaro_winkler;

use crate::Exercise;
use crate::storage;

const HISTORY_KEY: &str = "exerciseHistory";

/// Typical equipment used for an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Machine,
    Cable,
    Bodyweight,
    Other,
}

/// Static metadata about a built-in exercise.
#[derive(Debug, Clone, Copy)]
pub struct ExerciseInfo {
    pub muscle_group: &'static str,
    pub equipment: Equipment,
}

pub static EXERCISES: phf::Map<&'static str, ExerciseInfo> = phf_map! {
    "Bench Press" => ExerciseInfo { muscle_group: "Chest", equipment: Equipment::Barbell },
    "Incline Bench Press" => ExerciseInfo { muscle_group: "Chest", equipment: Equipment::Barbell },
    "Dumbbell Fly" => ExerciseInfo { muscle_group: "Chest", equipment: Equipment::Dumbbell },
    "Push-Up" => ExerciseInfo { muscle_group: "Chest", equipment: Equipment::Bodyweight },
    "Overhead Press" => ExerciseInfo { muscle_group: "Shoulders", equipment: Equipment::Barbell },
    "Lateral Raise" => ExerciseInfo { muscle_group: "Shoulders", equipment: Equipment::Dumbbell },
    "Squat" => ExerciseInfo { muscle_group: "Quads", equipment: Equipment::Barbell },
    "Front Squat" => ExerciseInfo { muscle_group: "Quads", equipment: Equipment::Barbell },
    "Leg Press" => ExerciseInfo { muscle_group: "Quads", equipment: Equipment::Machine },
    "Leg Extension" => ExerciseInfo { muscle_group: "Quads", equipment: Equipment::Machine },
    "Lying Leg Curl" => ExerciseInfo { muscle_group: "Hamstrings", equipment: Equipment::Machine },
    "Romanian Deadlift" => ExerciseInfo { muscle_group: "Hamstrings", equipment: Equipment::Barbell },
    "Deadlift" => ExerciseInfo { muscle_group: "Back", equipment: Equipment::Barbell },
    "Barbell Row" => ExerciseInfo { muscle_group: "Back", equipment: Equipment::Barbell },
    "Lat Pulldown" => ExerciseInfo { muscle_group: "Back", equipment: Equipment::Cable },
    "Pull-Up" => ExerciseInfo { muscle_group: "Back", equipment: Equipment::Bodyweight },
    "Seated Cable Row" => ExerciseInfo { muscle_group: "Back", equipment: Equipment::Cable },
    "Hip Thrust" => ExerciseInfo { muscle_group: "Glutes", equipment: Equipment::Barbell },
    "Barbell Curl" => ExerciseInfo { muscle_group: "Biceps", equipment: Equipment::Barbell },
    "Hammer Curl" => ExerciseInfo { muscle_group: "Biceps", equipment: Equipment::Dumbbell },
    "Triceps Pushdown" => ExerciseInfo { muscle_group: "Triceps", equipment: Equipment::Cable },
    "Skull Crusher" => ExerciseInfo { muscle_group: "Triceps", equipment: Equipment::Barbell },
    "Standing Calf Raise" => ExerciseInfo { muscle_group: "Calves", equipment: Equipment::Machine },
    "Plank" => ExerciseInfo { muscle_group: "Core", equipment: Equipment::Bodyweight },
};

/// Lookup static metadata for a built-in exercise name.
pub fn info_for(name: &str) -> Option<&'static ExerciseInfo> {
    EXERCISES.get(name)
}

pub fn muscle_group_for(name: &str) -> Option<&'static str> {
    info_for(name).map(|i| i.muscle_group)
}

pub fn equipment_for(name: &str) -> Option<Equipment> {
    info_for(name).map(|i| i.equipment)
}

/// Sorted list of all built-in exercise names.
pub fn builtin_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = EXERCISES.keys().copied().collect();
    names.sort_unstable();
    names
}

/// The persisted exercise-name history, most recently used first.
pub fn history() -> Vec<String> {
    storage::read(HISTORY_KEY)
}

/// Move the given exercises' names to the front of the history list.
///
/// Names are deduplicated case-insensitively and blanks are dropped. No
/// referential integrity is kept with saved workouts or templates; the
/// list is purely an autocomplete source.
pub fn record_names(exercises: &[Exercise]) -> bool {
    let used: Vec<String> = exercises
        .iter()
        .map(|e| e.name.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    if used.is_empty() {
        return true;
    }
    match storage::update(HISTORY_KEY, |names: &mut Vec<String>| {
        for name in used.iter().rev() {
            names.retain(|n| !n.eq_ignore_ascii_case(name));
            names.insert(0, name.clone());
        }
    }) {
        Ok(()) => true,
        Err(e) => {
            log::error!("failed to persist exercise history: {e}");
            false
        }
    }
}

/// Autocomplete suggestions for a partially typed exercise name.
///
/// Candidates come from the history and the built-in table. Substring
/// matches rank ahead of fuzzy (Jaro-Winkler) matches, closer names first;
/// exact score ties keep history order.
pub fn suggest(query: &str, limit: usize) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut candidates = history();
    for name in builtin_names() {
        if !candidates.iter().any(|c| c.eq_ignore_ascii_case(name)) {
            candidates.push(name.to_string());
        }
    }

    let mut scored: Vec<(f64, String)> = candidates
        .into_iter()
        .filter_map(|name| {
            let lower = name.to_lowercase();
            let similarity = jaro_winkler(&lower, &query);
            if lower.contains(&query) {
                Some((1.0 + similarity, name))
            } else if similarity >= 0.75 {
                Some((similarity, name))
            } else {
                None
            }
        })
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.truncate(limit);
    scored.into_iter().map(|(_, name)| name).collect()
}
