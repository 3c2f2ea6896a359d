use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sets given to a freshly added entry.
pub const DEFAULT_SETS: u32 = 3;

/// Per-entry key, distinct from the catalog id so the same exercise can
/// appear twice in one draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An exercise as handed over by a picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogExercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Either a single rep target or a min-max range. Values are free text,
/// numeric-intended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepTarget {
    Fixed { reps: String },
    Range { min: String, max: String },
}

impl RepTarget {
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resistance {
    BodyWeight,
    Loaded { value: String },
}

impl Resistance {
    pub fn is_bodyweight(&self) -> bool {
        matches!(self, Self::BodyWeight)
    }
}

/// One configured exercise within a draft.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExerciseEntry {
    pub key: EntryId,
    pub exercise_id: String,
    pub name: String,
    pub sets: u32,
    pub reps: RepTarget,
    pub resistance: Resistance,
    /// Presentation only: show the summary line instead of the controls.
    pub collapsed: bool,
}

impl WorkoutExerciseEntry {
    pub fn from_catalog(exercise: &CatalogExercise) -> Self {
        Self {
            key: EntryId::new(),
            exercise_id: exercise.id.clone(),
            name: exercise.name.clone(),
            sets: DEFAULT_SETS,
            reps: RepTarget::Fixed {
                reps: String::new(),
            },
            resistance: Resistance::Loaded {
                value: String::new(),
            },
            collapsed: false,
        }
    }
}

/// The in-progress workout. Entry order becomes the persisted position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutDraft {
    pub name: String,
    pub exercises: Vec<WorkoutExerciseEntry>,
}

impl WorkoutDraft {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.exercises.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWorkout {
    pub owner_id: String,
    pub name: String,
}

/// A workout row as returned by the backend after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutRecord {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One persisted exercise of a workout. Exactly one of `reps` or
/// (`reps_min`, `reps_max`) is populated; `resistance_value` is null for
/// bodyweight rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutExerciseRow {
    pub workout_id: String,
    pub exercise_id: String,
    pub position: u32,
    pub sets: u32,
    pub reps: Option<String>,
    pub reps_min: Option<String>,
    pub reps_max: Option<String>,
    pub resistance_value: Option<String>,
    pub is_bodyweight: bool,
}

impl WorkoutExerciseRow {
    pub fn from_entry(workout_id: &str, position: u32, entry: &WorkoutExerciseEntry) -> Self {
        let (reps, reps_min, reps_max) = match &entry.reps {
            RepTarget::Fixed { reps } => (Some(reps.clone()), None, None),
            RepTarget::Range { min, max } => (None, Some(min.clone()), Some(max.clone())),
        };
        let resistance_value = match &entry.resistance {
            Resistance::BodyWeight => None,
            Resistance::Loaded { value } => Some(value.clone()),
        };

        Self {
            workout_id: workout_id.to_string(),
            exercise_id: entry.exercise_id.clone(),
            position,
            sets: entry.sets,
            reps,
            reps_min,
            reps_max,
            resistance_value,
            is_bodyweight: entry.resistance.is_bodyweight(),
        }
    }

    /// Rebuild a (collapsed) entry from a stored row so it can be rendered
    /// with the same display helpers as a draft.
    pub fn into_entry(self, name: String) -> WorkoutExerciseEntry {
        let reps = match (self.reps, self.reps_min, self.reps_max) {
            (Some(reps), None, None) => RepTarget::Fixed { reps },
            (None, min, max) if min.is_some() || max.is_some() => RepTarget::Range {
                min: min.unwrap_or_default(),
                max: max.unwrap_or_default(),
            },
            (reps, _, _) => RepTarget::Fixed {
                reps: reps.unwrap_or_default(),
            },
        };
        let resistance = if self.is_bodyweight {
            Resistance::BodyWeight
        } else {
            Resistance::Loaded {
                value: self.resistance_value.unwrap_or_default(),
            }
        };

        WorkoutExerciseEntry {
            key: EntryId::new(),
            exercise_id: self.exercise_id,
            name,
            sets: self.sets.max(1),
            reps,
            resistance,
            collapsed: true,
        }
    }
}
