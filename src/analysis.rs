//! Derived statistics over the workout log.
//!
//! The nested Workout → Exercise → Set model is flattened into per-set
//! rows normalized to one weight unit, then everything is linear scans and
//! reductions. Sets whose reps or weight fail to parse are skipped, the
//! same way entries with invalid dates are.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

use crate::{WeightUnit, Workout};

/// Available formulas for estimating a one-rep max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OneRmFormula {
    /// Epley formula: `weight * (1 + reps / 30)`.
    Epley,
    /// Brzycki formula: `weight / (1.0278 - 0.0278 * reps)`, undefined at
    /// 37 or more reps.
    Brzycki,
}

impl Default for OneRmFormula {
    fn default() -> Self {
        OneRmFormula::Brzycki
    }
}

impl OneRmFormula {
    pub fn estimate(self, weight: f32, reps: u32) -> Option<f32> {
        match self {
            OneRmFormula::Epley => Some(weight * (1.0 + reps as f32 / 30.0)),
            OneRmFormula::Brzycki => {
                if reps >= 37 {
                    return None;
                }
                Some(weight / (1.0278 - 0.0278 * reps as f32))
            }
        }
    }
}

/// One parsed set, flattened out of the nested workout structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetRow {
    pub date: String,
    pub workout_id: Uuid,
    pub exercise: String,
    /// Position of the set within its exercise.
    pub set_index: usize,
    pub weight: f32,
    pub reps: u32,
    pub completed: bool,
}

/// Flatten `workouts` into per-set rows with weights expressed in `unit`.
///
/// Each set's weight string is interpreted in its workout's unit unless it
/// carries an explicit suffix. Unparseable sets are skipped.
pub fn set_rows(workouts: &[Workout], unit: WeightUnit) -> Vec<SetRow> {
    let mut rows = Vec::new();
    for workout in workouts {
        for exercise in &workout.exercises {
            for (set_index, set) in exercise.sets.iter().enumerate() {
                let (Some(reps), Some(weight)) =
                    (set.parsed_reps(), set.weight_in(workout.weight_unit, unit))
                else {
                    continue;
                };
                rows.push(SetRow {
                    date: workout.date.clone(),
                    workout_id: workout.id,
                    exercise: exercise.name.clone(),
                    set_index,
                    weight,
                    reps,
                    completed: set.completed,
                });
            }
        }
    }
    rows
}

/// Summary statistics about the workout log.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    pub total_workouts: usize,
    pub avg_sets_per_workout: f32,
    pub avg_reps_per_set: f32,
    pub avg_days_between: f32,
    pub most_common_exercise: Option<String>,
}

/// Compute overall statistics for the saved workouts.
///
/// Only workouts within the optional `start`/`end` date range count, and
/// workouts with unparseable dates are skipped. The reps average covers
/// the sets whose rep strings parse.
pub fn compute_stats(
    workouts: &[Workout],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> BasicStats {
    let mut total_workouts = 0usize;
    let mut total_sets = 0usize;
    let mut parsed_sets = 0usize;
    let mut total_reps = 0u64;
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut exercise_counts: HashMap<&str, usize> = HashMap::new();

    for workout in workouts {
        let Some(d) = parse_date(&workout.date) else {
            continue;
        };
        if !in_range(d, start, end) {
            continue;
        }
        total_workouts += 1;
        dates.push(d);
        for exercise in &workout.exercises {
            total_sets += exercise.sets.len();
            *exercise_counts.entry(exercise.name.as_str()).or_insert(0) += exercise.sets.len();
            for set in &exercise.sets {
                if let Some(reps) = set.parsed_reps() {
                    parsed_sets += 1;
                    total_reps += u64::from(reps);
                }
            }
        }
    }

    if total_workouts == 0 {
        log::warn!("no workouts with valid dates in range");
        return BasicStats::default();
    }

    let avg_sets_per_workout = total_sets as f32 / total_workouts as f32;
    let avg_reps_per_set = if parsed_sets > 0 {
        total_reps as f32 / parsed_sets as f32
    } else {
        0.0
    };

    dates.sort();
    dates.dedup();
    let mut total_gap_days = 0i64;
    for w in dates.windows(2) {
        if let [a, b] = w {
            total_gap_days += (*b - *a).num_days();
        }
    }
    let avg_days_between = if dates.len() > 1 {
        total_gap_days as f32 / (dates.len() as f32 - 1.0)
    } else {
        0.0
    };

    let most_common_exercise = exercise_counts
        .into_iter()
        .max_by_key(|(_, c)| *c)
        .map(|(name, _)| name.to_string());

    BasicStats {
        total_workouts,
        avg_sets_per_workout,
        avg_reps_per_set,
        avg_days_between,
        most_common_exercise,
    }
}

/// Aggregated statistics for a single exercise.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseStats {
    pub total_sets: usize,
    pub total_reps: u32,
    pub total_volume: f32,
    pub best_est_1rm: Option<f32>,
    pub best_weight: Option<f32>,
}

/// Aggregate per-exercise statistics, optionally limited to a date range.
pub fn aggregate_exercise_stats(
    workouts: &[Workout],
    unit: WeightUnit,
    formula: OneRmFormula,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> HashMap<String, ExerciseStats> {
    let mut map: HashMap<String, ExerciseStats> = HashMap::new();
    for row in set_rows(workouts, unit) {
        let Some(d) = parse_date(&row.date) else {
            continue;
        };
        if !in_range(d, start, end) {
            continue;
        }
        let stats = map.entry(row.exercise.clone()).or_default();
        stats.total_sets += 1;
        stats.total_reps += row.reps;
        stats.total_volume += row.weight * row.reps as f32;
        stats.best_weight = match stats.best_weight {
            Some(w) if w >= row.weight => Some(w),
            _ => Some(row.weight),
        };
        if let Some(est) = formula.estimate(row.weight, row.reps) {
            stats.best_est_1rm = match stats.best_est_1rm {
                Some(current) if current >= est => Some(current),
                _ => Some(est),
            };
        }
    }
    map
}

/// Per-exercise personal records.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub max_weight: Option<f32>,
    pub max_volume: Option<f32>,
    pub best_est_1rm: Option<f32>,
}

/// Personal records for every exercise, sorted by exercise name.
pub fn personal_records(
    workouts: &[Workout],
    unit: WeightUnit,
    formula: OneRmFormula,
) -> Vec<(String, ExerciseRecord)> {
    let mut map: HashMap<String, ExerciseRecord> = HashMap::new();
    for row in set_rows(workouts, unit) {
        let record = map.entry(row.exercise.clone()).or_default();
        let volume = row.weight * row.reps as f32;
        record.max_weight = match record.max_weight {
            Some(w) if w >= row.weight => Some(w),
            _ => Some(row.weight),
        };
        record.max_volume = match record.max_volume {
            Some(v) if v >= volume => Some(v),
            _ => Some(volume),
        };
        if let Some(est) = formula.estimate(row.weight, row.reps) {
            record.best_est_1rm = match record.best_est_1rm {
                Some(current) if current >= est => Some(current),
                _ => Some(est),
            };
        }
    }
    let mut records: Vec<(String, ExerciseRecord)> = map.into_iter().collect();
    records.sort_by(|a, b| a.0.cmp(&b.0));
    records
}

/// The single highest-volume set recorded for an exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestSet {
    pub date: String,
    pub weight: f32,
    pub reps: u32,
    pub volume: f32,
    pub est_one_rm: Option<f32>,
}

/// Find the set with the strictly highest weight×reps product for
/// `exercise`. Ties keep the first occurrence in stored order.
pub fn best_performance(
    workouts: &[Workout],
    exercise: &str,
    unit: WeightUnit,
    formula: OneRmFormula,
) -> Option<BestSet> {
    let mut best: Option<BestSet> = None;
    for row in set_rows(workouts, unit) {
        if row.exercise != exercise {
            continue;
        }
        let volume = row.weight * row.reps as f32;
        if best.as_ref().map_or(true, |b| volume > b.volume) {
            best = Some(BestSet {
                date: row.date,
                weight: row.weight,
                reps: row.reps,
                volume,
                est_one_rm: formula.estimate(row.weight, row.reps),
            });
        }
    }
    best
}

/// Highest single-set weight ever logged for `exercise`.
pub fn max_weight(workouts: &[Workout], exercise: &str, unit: WeightUnit) -> Option<f32> {
    set_rows(workouts, unit)
        .into_iter()
        .filter(|row| row.exercise == exercise)
        .map(|row| row.weight)
        .fold(None, |acc, w| match acc {
            Some(current) if current >= w => Some(current),
            _ => Some(w),
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySet {
    pub weight: f32,
    pub reps: u32,
    pub completed: bool,
}

/// One workout's showing of a given exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub workout_id: Uuid,
    pub date: String,
    pub sets: Vec<HistorySet>,
}

/// Per-workout history for `exercise`, in stored order.
pub fn exercise_history(
    workouts: &[Workout],
    exercise: &str,
    unit: WeightUnit,
) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();
    for workout in workouts {
        let mut sets = Vec::new();
        for ex in workout.exercises.iter().filter(|ex| ex.name == exercise) {
            for set in &ex.sets {
                let (Some(reps), Some(weight)) =
                    (set.parsed_reps(), set.weight_in(workout.weight_unit, unit))
                else {
                    continue;
                };
                sets.push(HistorySet {
                    weight,
                    reps,
                    completed: set.completed,
                });
            }
        }
        if !sets.is_empty() {
            entries.push(HistoryEntry {
                workout_id: workout.id,
                date: workout.date.clone(),
                sets,
            });
        }
    }
    entries
}

/// Training volume bucketed by ISO week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub year: i32,
    pub week: u32,
    pub total_volume: f32,
    pub total_sets: usize,
    pub workouts: usize,
}

/// Aggregate volume per ISO week, in chronological order.
pub fn weekly_summary(
    workouts: &[Workout],
    unit: WeightUnit,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<WeeklySummary> {
    let mut buckets: BTreeMap<(i32, u32), (f32, usize, HashSet<Uuid>)> = BTreeMap::new();
    for row in set_rows(workouts, unit) {
        let Some(d) = parse_date(&row.date) else {
            continue;
        };
        if !in_range(d, start, end) {
            continue;
        }
        let key = (d.iso_week().year(), d.iso_week().week());
        let bucket = buckets
            .entry(key)
            .or_insert_with(|| (0.0, 0, HashSet::new()));
        bucket.0 += row.weight * row.reps as f32;
        bucket.1 += 1;
        bucket.2.insert(row.workout_id);
    }
    buckets
        .into_iter()
        .map(|((year, week), (total_volume, total_sets, ids))| WeeklySummary {
            year,
            week,
            total_volume,
            total_sets,
            workouts: ids.len(),
        })
        .collect()
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn in_range(d: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e)
}
