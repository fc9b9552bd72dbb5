//! CSV and JSON exports of the workout log and derived statistics.

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::analysis::{BasicStats, ExerciseRecord, ExerciseStats, set_rows};
use crate::{WeightUnit, Workout};

pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: &[T]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(Into::into)
}

/// Full workout log with the nested structure intact.
pub fn save_workouts_json<P: AsRef<Path>>(path: P, workouts: &[Workout]) -> std::io::Result<()> {
    write_json(workouts, path)
}

/// Workout log flattened to one row per parsed set, weights in `unit`.
pub fn save_workouts_csv<P: AsRef<Path>>(
    path: P,
    workouts: &[Workout],
    unit: WeightUnit,
) -> csv::Result<()> {
    let rows = set_rows(workouts, unit);
    write_csv(std::fs::File::create(path)?, &rows)
}

#[derive(Serialize)]
struct ExerciseStatsRow<'a> {
    exercise: &'a str,
    total_sets: usize,
    total_reps: u32,
    total_volume: f32,
    best_weight: Option<f32>,
    best_est_1rm: Option<f32>,
}

pub fn save_exercise_stats_csv<P: AsRef<Path>>(
    path: P,
    stats: &[(String, ExerciseStats)],
) -> csv::Result<()> {
    let rows: Vec<ExerciseStatsRow> = stats
        .iter()
        .map(|(exercise, s)| ExerciseStatsRow {
            exercise,
            total_sets: s.total_sets,
            total_reps: s.total_reps,
            total_volume: s.total_volume,
            best_weight: s.best_weight,
            best_est_1rm: s.best_est_1rm,
        })
        .collect();
    write_csv(std::fs::File::create(path)?, &rows)
}

pub fn save_summary_csv<P: AsRef<Path>>(path: P, stats: &BasicStats) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.serialize(stats)?;
    wtr.flush().map_err(Into::into)
}

#[derive(Serialize)]
pub struct StatsExport<'a> {
    pub summary: &'a BasicStats,
    pub exercises: &'a [(String, ExerciseStats)],
}

/// Summary and per-exercise stats in one JSON document.
pub fn save_stats_json<P: AsRef<Path>>(
    path: P,
    summary: &BasicStats,
    exercises: &[(String, ExerciseStats)],
) -> std::io::Result<()> {
    let export = StatsExport { summary, exercises };
    write_json(&export, path)
}

#[derive(Serialize)]
struct RecordRow<'a> {
    exercise: &'a str,
    max_weight: Option<f32>,
    max_volume: Option<f32>,
    best_est_1rm: Option<f32>,
}

pub fn save_records_csv<P: AsRef<Path>>(
    path: P,
    records: &[(String, ExerciseRecord)],
) -> csv::Result<()> {
    let rows: Vec<RecordRow> = records
        .iter()
        .map(|(exercise, r)| RecordRow {
            exercise,
            max_weight: r.max_weight,
            max_volume: r.max_volume,
            best_est_1rm: r.best_est_1rm,
        })
        .collect();
    write_csv(std::fs::File::create(path)?, &rows)
}

pub fn save_records_json<P: AsRef<Path>>(
    path: P,
    records: &[(String, ExerciseRecord)],
) -> std::io::Result<()> {
    write_json(records, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{aggregate_exercise_stats, compute_stats, personal_records};
    use crate::storage::testutil;
    use crate::{Exercise, ExerciseSet, analysis::OneRmFormula};

    fn sample_log() -> Vec<Workout> {
        let mut w = Workout::new("2026-08-01", WeightUnit::Lbs);
        let mut ex = Exercise::new("Bench Press");
        ex.sets.push(ExerciseSet::new("5", "135"));
        ex.sets.push(ExerciseSet::new("3", "145"));
        w.exercises.push(ex);
        vec![w]
    }

    #[test]
    fn workouts_csv_has_one_row_per_set() {
        let store = testutil::temp_store();
        let path = store.path().join("workouts.csv");

        save_workouts_csv(&path, &sample_log(), WeightUnit::Lbs).unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        let mut lines = data.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("exercise"));
        assert!(header.contains("weight"));
        assert_eq!(lines.count(), 2);
        assert!(data.contains("Bench Press"));
        assert!(data.contains("135"));
    }

    #[test]
    fn workouts_json_roundtrips() {
        let store = testutil::temp_store();
        let path = store.path().join("workouts.json");
        let log = sample_log();

        save_workouts_json(&path, &log).unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        let loaded: Vec<Workout> = serde_json::from_str(&data).unwrap();
        assert_eq!(loaded, log);
    }

    #[test]
    fn stats_exports_contain_expected_values() {
        let store = testutil::temp_store();
        let log = sample_log();
        let summary = compute_stats(&log, None, None);
        let stats: Vec<(String, ExerciseStats)> =
            aggregate_exercise_stats(&log, WeightUnit::Lbs, OneRmFormula::Brzycki, None, None)
                .into_iter()
                .collect();

        let csv_path = store.path().join("stats.csv");
        save_exercise_stats_csv(&csv_path, &stats).unwrap();
        let data = std::fs::read_to_string(&csv_path).unwrap();
        assert!(data.contains("Bench Press"));
        // 5*135 + 3*145 = 1110 total volume.
        assert!(data.contains("1110"));

        let json_path = store.path().join("stats.json");
        save_stats_json(&json_path, &summary, &stats).unwrap();
        let data = std::fs::read_to_string(&json_path).unwrap();
        assert!(data.contains("\"total_workouts\": 1"));

        let summary_path = store.path().join("summary.csv");
        save_summary_csv(&summary_path, &summary).unwrap();
        let data = std::fs::read_to_string(&summary_path).unwrap();
        assert!(data.contains("total_workouts"));
    }

    #[test]
    fn records_csv_lists_per_exercise_records() {
        let store = testutil::temp_store();
        let log = sample_log();
        let records = personal_records(&log, WeightUnit::Lbs, OneRmFormula::Brzycki);

        let path = store.path().join("records.csv");
        save_records_csv(&path, &records).unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        assert!(data.starts_with("exercise,max_weight,max_volume,best_est_1rm"));
        assert!(data.contains("Bench Press,145.0,675.0,"));
    }
}
