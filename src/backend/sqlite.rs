use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;
use uuid::Uuid;

use super::{ExerciseCatalog, WorkoutBackend};
use crate::db::DB;
use crate::error::BackendError;
use crate::models::{CatalogExercise, NewWorkout, WorkoutExerciseRow, WorkoutRecord};

/// Local store on top of the SQLite pool from [`crate::db`].
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: DB,
}

impl SqliteBackend {
    pub fn new(pool: DB) -> Self {
        Self { pool }
    }

    pub async fn list_workouts(&self) -> Result<Vec<WorkoutRecord>, BackendError> {
        let rows = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, owner_id, name, created_at
            FROM workouts
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_workout(&self, workout_id: &str) -> Result<Option<WorkoutRecord>, BackendError> {
        let row = sqlx::query_as::<_, WorkoutRecord>(
            "SELECT id, owner_id, name, created_at FROM workouts WHERE id = ?",
        )
        .bind(workout_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn workout_exercises(&self, workout_id: &str) -> Result<Vec<WorkoutExerciseRow>, BackendError> {
        let rows = sqlx::query_as::<_, WorkoutExerciseRow>(
            r#"
            SELECT workout_id, exercise_id, position, sets,
                   reps, reps_min, reps_max, resistance_value, is_bodyweight
            FROM workout_exercises
            WHERE workout_id = ?
            ORDER BY position
            "#,
        )
        .bind(workout_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl WorkoutBackend for SqliteBackend {
    async fn insert_workout(&self, record: &NewWorkout) -> Result<Option<WorkoutRecord>, BackendError> {
        let row = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            INSERT INTO workouts (id, owner_id, name, created_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            RETURNING id, owner_id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&record.owner_id)
        .bind(&record.name)
        .fetch_optional(&self.pool)
        .await?;

        debug!(workout = ?row.as_ref().map(|r| &r.id), "inserted workout");
        Ok(row)
    }

    async fn insert_workout_exercises(&self, rows: &[WorkoutExerciseRow]) -> Result<(), BackendError> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO workout_exercises \
             (workout_id, exercise_id, position, sets, reps, reps_min, reps_max, resistance_value, is_bodyweight) ",
        );
        qb.push_values(rows, |mut b, row| {
            b.push_bind(row.workout_id.clone())
                .push_bind(row.exercise_id.clone())
                .push_bind(row.position)
                .push_bind(row.sets)
                .push_bind(row.reps.clone())
                .push_bind(row.reps_min.clone())
                .push_bind(row.reps_max.clone())
                .push_bind(row.resistance_value.clone())
                .push_bind(row.is_bodyweight);
        });

        let res = qb.build().execute(&self.pool).await?;
        debug!(rows = res.rows_affected(), "inserted workout exercises");
        Ok(())
    }

    async fn delete_workout(&self, workout_id: &str) -> Result<(), BackendError> {
        sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(workout_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ExerciseCatalog for SqliteBackend {
    async fn search(&self, query: &str) -> Result<Vec<CatalogExercise>, BackendError> {
        // instr() instead of LIKE so `%` and `_` in the query match literally.
        let rows = sqlx::query_as::<_, CatalogExercise>(
            r#"
            SELECT id, name, description
            FROM exercises
            WHERE instr(lower(name), ?) > 0
            ORDER BY idx
            "#,
        )
        .bind(query.trim().to_lowercase())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: &str) -> Result<Option<CatalogExercise>, BackendError> {
        let row = sqlx::query_as::<_, CatalogExercise>(
            "SELECT id, name, description FROM exercises WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn add(&self, name: &str, description: Option<&str>) -> Result<CatalogExercise, BackendError> {
        let row = sqlx::query_as::<_, CatalogExercise>(
            r#"
            INSERT INTO exercises (id, name, description, created_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            RETURNING id, name, description
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
