//! Core domain types for the LiftLog workout tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise types (the user-managed catalog)
//! - Exercise entries (one exercise performed within a workout)
//! - Workouts (a dated collection of entries)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined exercise type (e.g., "Bench Press")
///
/// Identifiers are minted at creation and never reassigned. Deleting a type
/// does not cascade to historical workouts; lookups against a removed type
/// fall back to the `"(deleted)"` label.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExerciseType {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<String>,
}

impl ExerciseType {
    /// Create a new exercise type with a fresh identifier
    pub fn new(name: &str, muscle_group: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            muscle_group: muscle_group.map(|g| g.trim().to_string()),
        }
    }
}

/// One exercise performed within a workout
///
/// `type_id` is a weak reference into the catalog and may dangle.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExerciseEntry {
    pub id: Uuid,
    pub type_id: Uuid,
    pub weight: f64,
    pub reps: u32,
    pub sets: u32,
}

impl ExerciseEntry {
    /// Create a new entry with a fresh identifier
    pub fn new(type_id: Uuid, weight: f64, reps: u32, sets: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            type_id,
            weight,
            reps,
            sets,
        }
    }

    /// Total load contributed by this entry: `weight * reps * sets`.
    ///
    /// A non-finite or negative weight contributes zero rather than
    /// poisoning downstream aggregates.
    pub fn volume(&self) -> f64 {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return 0.0;
        }
        self.weight * f64::from(self.reps) * f64::from(self.sets)
    }
}

/// A recorded workout: a dated, ordered list of exercise entries
///
/// Entry order is display order only; aggregation never depends on it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Workout {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub exercises: Vec<ExerciseEntry>,
}

impl Workout {
    /// Create a new workout with a fresh identifier
    pub fn new(date: DateTime<Utc>, notes: Option<String>, exercises: Vec<ExerciseEntry>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            notes: notes.filter(|n| !n.trim().is_empty()),
            exercises,
        }
    }

    /// Total volume across all entries
    pub fn volume(&self) -> f64 {
        self.exercises.iter().map(ExerciseEntry::volume).sum()
    }
}
