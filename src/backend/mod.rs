//! Data-access capabilities consumed by the composer and the CLI.
//!
//! [`WorkoutBackend`] is the write side a save needs: insert the workout and
//! get the row back, then bulk-insert its exercises. [`ExerciseCatalog`] is
//! what an exercise picker reads from. [`Backend`] picks one of the concrete
//! stores at runtime.

mod rest;
mod sqlite;

pub use rest::RestBackend;
pub use sqlite::SqliteBackend;

use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::{CatalogExercise, NewWorkout, WorkoutExerciseRow, WorkoutRecord};

#[async_trait]
pub trait WorkoutBackend: Send + Sync {
    /// Insert one workout and return the stored row, or `None` when the
    /// store accepted the write but handed nothing back.
    async fn insert_workout(&self, record: &NewWorkout) -> Result<Option<WorkoutRecord>, BackendError>;

    /// Insert all rows in a single call.
    async fn insert_workout_exercises(&self, rows: &[WorkoutExerciseRow]) -> Result<(), BackendError>;

    /// Remove a workout. Only used to clean up after a failed exercise insert.
    async fn delete_workout(&self, workout_id: &str) -> Result<(), BackendError>;
}

#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Case-insensitive substring match on the name. An empty query lists
    /// everything.
    async fn search(&self, query: &str) -> Result<Vec<CatalogExercise>, BackendError>;

    async fn find(&self, id: &str) -> Result<Option<CatalogExercise>, BackendError>;

    async fn add(&self, name: &str, description: Option<&str>) -> Result<CatalogExercise, BackendError>;
}

/// The store selected by configuration.
#[derive(Debug, Clone)]
pub enum Backend {
    Sqlite(SqliteBackend),
    Rest(RestBackend),
}

impl Backend {
    /// Workouts, newest first.
    pub async fn list_workouts(&self) -> Result<Vec<WorkoutRecord>, BackendError> {
        match self {
            Self::Sqlite(b) => b.list_workouts().await,
            Self::Rest(b) => b.list_workouts().await,
        }
    }

    pub async fn find_workout(&self, workout_id: &str) -> Result<Option<WorkoutRecord>, BackendError> {
        match self {
            Self::Sqlite(b) => b.find_workout(workout_id).await,
            Self::Rest(b) => b.find_workout(workout_id).await,
        }
    }

    /// Exercises of one workout, ordered by position.
    pub async fn workout_exercises(&self, workout_id: &str) -> Result<Vec<WorkoutExerciseRow>, BackendError> {
        match self {
            Self::Sqlite(b) => b.workout_exercises(workout_id).await,
            Self::Rest(b) => b.workout_exercises(workout_id).await,
        }
    }
}

#[async_trait]
impl WorkoutBackend for Backend {
    async fn insert_workout(&self, record: &NewWorkout) -> Result<Option<WorkoutRecord>, BackendError> {
        match self {
            Self::Sqlite(b) => b.insert_workout(record).await,
            Self::Rest(b) => b.insert_workout(record).await,
        }
    }

    async fn insert_workout_exercises(&self, rows: &[WorkoutExerciseRow]) -> Result<(), BackendError> {
        match self {
            Self::Sqlite(b) => b.insert_workout_exercises(rows).await,
            Self::Rest(b) => b.insert_workout_exercises(rows).await,
        }
    }

    async fn delete_workout(&self, workout_id: &str) -> Result<(), BackendError> {
        match self {
            Self::Sqlite(b) => b.delete_workout(workout_id).await,
            Self::Rest(b) => b.delete_workout(workout_id).await,
        }
    }
}

#[async_trait]
impl ExerciseCatalog for Backend {
    async fn search(&self, query: &str) -> Result<Vec<CatalogExercise>, BackendError> {
        match self {
            Self::Sqlite(b) => b.search(query).await,
            Self::Rest(b) => b.search(query).await,
        }
    }

    async fn find(&self, id: &str) -> Result<Option<CatalogExercise>, BackendError> {
        match self {
            Self::Sqlite(b) => b.find(id).await,
            Self::Rest(b) => b.find(id).await,
        }
    }

    async fn add(&self, name: &str, description: Option<&str>) -> Result<CatalogExercise, BackendError> {
        match self {
            Self::Sqlite(b) => b.add(name, description).await,
            Self::Rest(b) => b.add(name, description).await,
        }
    }
}
