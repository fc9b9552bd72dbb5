//! CRUD service over the persisted workout log.
//!
//! Failures are logged and reported as safe defaults (`false`, empty list)
//! rather than propagated; callers surface a generic alert at most.

use uuid::Uuid;

use crate::{Workout, catalog, storage};

const WORKOUTS_KEY: &str = "workouts";

/// All saved workouts in insertion order. Empty on storage failure.
pub fn all() -> Vec<Workout> {
    storage::read(WORKOUTS_KEY)
}

pub fn get(id: Uuid) -> Option<Workout> {
    all().into_iter().find(|w| w.id == id)
}

/// Append a completed workout to the log and refresh the exercise-name
/// history used for autocomplete.
pub fn save(workout: Workout) -> bool {
    let exercises = workout.exercises.clone();
    if let Err(e) = storage::update(WORKOUTS_KEY, |list: &mut Vec<Workout>| list.push(workout)) {
        log::error!("failed to save workout: {e}");
        return false;
    }
    catalog::record_names(&exercises)
}

/// Replace a saved workout in place. Returns false when the id is unknown.
pub fn update(workout: Workout) -> bool {
    let id = workout.id;
    match storage::update(WORKOUTS_KEY, |list: &mut Vec<Workout>| {
        match list.iter_mut().find(|w| w.id == workout.id) {
            Some(slot) => {
                *slot = workout;
                true
            }
            None => false,
        }
    }) {
        Ok(found) => {
            if !found {
                log::warn!("update for unknown workout {id}");
            }
            found
        }
        Err(e) => {
            log::error!("failed to update workout {id}: {e}");
            false
        }
    }
}

/// Remove exactly the workout with `id`, leaving the rest intact.
pub fn delete(id: Uuid) -> bool {
    match storage::update(WORKOUTS_KEY, |list: &mut Vec<Workout>| {
        let before = list.len();
        list.retain(|w| w.id != id);
        list.len() != before
    }) {
        Ok(removed) => removed,
        Err(e) => {
            log::error!("failed to delete workout {id}: {e}");
            false
        }
    }
}
