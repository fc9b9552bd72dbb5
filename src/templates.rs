//! Reusable workout templates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Exercise, ExerciseSet, Workout, storage};

const TEMPLATES_KEY: &str = "workoutTemplates";

/// A named snapshot of a workout's exercises, reusable as the starting
/// point for new sessions. Carries no dates and no per-set completion
/// state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub exercises: Vec<Exercise>,
}

/// All saved templates in insertion order.
pub fn all() -> Vec<Template> {
    storage::read(TEMPLATES_KEY)
}

pub fn get(id: Uuid) -> Option<Template> {
    all().into_iter().find(|t| t.id == id)
}

/// Snapshot `workout`'s exercises under `name`. Blank names are rejected,
/// matching the edit screen's only validation rule.
pub fn create_from_workout(name: &str, workout: &Workout) -> Option<Template> {
    let name = name.trim();
    if name.is_empty() {
        log::warn!("refusing to create template with an empty name");
        return None;
    }
    let template = Template {
        id: Uuid::new_v4(),
        name: name.to_string(),
        exercises: snapshot_exercises(&workout.exercises),
    };
    match storage::update(TEMPLATES_KEY, |list: &mut Vec<Template>| {
        list.push(template.clone())
    }) {
        Ok(()) => Some(template),
        Err(e) => {
            log::error!("failed to save template: {e}");
            None
        }
    }
}

pub fn delete(id: Uuid) -> bool {
    match storage::update(TEMPLATES_KEY, |list: &mut Vec<Template>| {
        let before = list.len();
        list.retain(|t| t.id != id);
        list.len() != before
    }) {
        Ok(removed) => removed,
        Err(e) => {
            log::error!("failed to delete template {id}: {e}");
            false
        }
    }
}

/// Deep-copy exercises with fresh ids and cleared completion flags, for
/// templates and for sessions started from one.
pub(crate) fn snapshot_exercises(exercises: &[Exercise]) -> Vec<Exercise> {
    exercises
        .iter()
        .map(|ex| Exercise {
            id: Uuid::new_v4(),
            name: ex.name.clone(),
            sets: ex
                .sets
                .iter()
                .map(|s| ExerciseSet {
                    id: Uuid::new_v4(),
                    reps: s.reps.clone(),
                    weight: s.weight.clone(),
                    completed: false,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WeightUnit;
    use crate::storage::testutil;

    fn finished_workout() -> Workout {
        let mut w = Workout::new("2026-08-01", WeightUnit::Lbs);
        let mut ex = Exercise::new("Bench Press");
        let mut set = ExerciseSet::new("5", "135");
        set.completed = true;
        ex.sets.push(set);
        w.exercises.push(ex);
        w
    }

    #[test]
    fn create_snapshots_without_set_state() {
        let _store = testutil::temp_store();
        let workout = finished_workout();

        let template = create_from_workout("Push Day", &workout).unwrap();
        assert_eq!(template.name, "Push Day");
        assert_eq!(template.exercises.len(), 1);
        let set = &template.exercises[0].sets[0];
        assert_eq!(set.reps, "5");
        assert_eq!(set.weight, "135");
        assert!(!set.completed);
        // Fresh ids, so editing the template can never touch the workout.
        assert_ne!(template.exercises[0].id, workout.exercises[0].id);

        assert_eq!(all(), vec![template]);
    }

    #[test]
    fn blank_names_are_rejected() {
        let _store = testutil::temp_store();
        let workout = finished_workout();
        assert!(create_from_workout("   ", &workout).is_none());
        assert!(all().is_empty());
    }

    #[test]
    fn delete_removes_only_that_template() {
        let _store = testutil::temp_store();
        let workout = finished_workout();
        let keep = create_from_workout("Keep", &workout).unwrap();
        let drop = create_from_workout("Drop", &workout).unwrap();

        assert!(delete(drop.id));
        assert_eq!(all(), vec![keep]);
        assert!(!delete(drop.id));
    }
}
