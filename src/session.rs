//! In-progress workout session, persisted for crash/resume recovery.
//!
//! The session is mirrored to the `activeWorkout` blob on every change so
//! an app restart can pick it back up. Elapsed time is always recomputed
//! from the stored start timestamp; nothing accumulates, so the value
//! survives restarts for free.

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::templates::{Template, snapshot_exercises};
use crate::{Exercise, WeightUnit, Workout, storage, workouts};

const ACTIVE_KEY: &str = "activeWorkout";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub exercises: Vec<Exercise>,
    pub weight_unit: WeightUnit,
    pub started_at: DateTime<Utc>,
}

impl ActiveSession {
    /// Start an empty session stamped with the current time.
    pub fn begin(weight_unit: WeightUnit) -> Self {
        Self {
            exercises: Vec::new(),
            weight_unit,
            started_at: Utc::now(),
        }
    }

    /// Start from a template snapshot: fresh set ids, nothing completed.
    pub fn from_template(template: &Template, weight_unit: WeightUnit) -> Self {
        Self {
            exercises: snapshot_exercises(&template.exercises),
            weight_unit,
            started_at: Utc::now(),
        }
    }

    /// Elapsed time against `now`, clamped at zero for clock skew.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.started_at).max(Duration::zero())
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Utc::now())
    }
}

/// Mirror the session to disk. Called on every edit.
pub fn save(session: &ActiveSession) -> bool {
    match storage::write(ACTIVE_KEY, session) {
        Ok(()) => true,
        Err(e) => {
            log::error!("failed to persist active session: {e}");
            false
        }
    }
}

/// Restore a pending session after a restart, if one exists.
pub fn resume() -> Option<ActiveSession> {
    storage::read(ACTIVE_KEY)
}

/// Discard the pending session.
pub fn clear() -> bool {
    match storage::clear(ACTIVE_KEY) {
        Ok(()) => true,
        Err(e) => {
            log::error!("failed to clear active session: {e}");
            false
        }
    }
}

/// Finish the session: turn it into a saved workout and clear the pending
/// record. Unnamed exercises are dropped; a session with nothing named is
/// left pending and `None` is returned.
pub fn complete(session: ActiveSession) -> Option<Workout> {
    complete_at(session, Utc::now())
}

pub fn complete_at(session: ActiveSession, finished_at: DateTime<Utc>) -> Option<Workout> {
    let exercises: Vec<Exercise> = session
        .exercises
        .into_iter()
        .filter(|ex| !ex.name.trim().is_empty())
        .collect();
    if exercises.is_empty() {
        log::warn!("session has no named exercises, nothing to save");
        return None;
    }

    let duration = finished_at
        .signed_duration_since(session.started_at)
        .num_seconds()
        .max(0) as u32;
    let workout = Workout {
        id: Uuid::new_v4(),
        // A session started before midnight logs on the day it began.
        date: session
            .started_at
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string(),
        start_time: Some(session.started_at),
        duration_secs: Some(duration),
        weight_unit: session.weight_unit,
        exercises,
    };

    if !workouts::save(workout.clone()) {
        return None;
    }
    if let Err(e) = storage::clear(ACTIVE_KEY) {
        log::warn!("saved workout but failed to clear active session: {e}");
    }
    Some(workout)
}
