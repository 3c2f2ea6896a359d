use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::{
    Executor, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub type DB = SqlitePool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS exercises (
    idx         INTEGER PRIMARY KEY AUTOINCREMENT,
    id          TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL UNIQUE,
    description TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workouts (
    id          TEXT PRIMARY KEY,
    owner_id    TEXT,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workout_exercises (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    workout_id       TEXT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
    exercise_id      TEXT NOT NULL,
    position         INTEGER NOT NULL,
    sets             INTEGER NOT NULL CHECK (sets >= 1),
    reps             TEXT,
    reps_min         TEXT,
    reps_max         TEXT,
    resistance_value TEXT,
    is_bodyweight    INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS workout_exercises_by_workout
    ON workout_exercises (workout_id, position);
"#;

pub async fn open(path: &str) -> Result<DB> {
    let opts = SqliteConnectOptions::from_str(path)
        .with_context(|| format!("Invalid database path: {}", path))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .with_context(|| format!("Failed to open database: {}", path))?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Private in-memory database. A single connection, since every new
/// connection to `:memory:` is a fresh, empty database.
pub async fn open_in_memory() -> Result<DB> {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &DB) -> Result<()> {
    pool.execute(SCHEMA)
        .await
        .context("Failed to create database schema")?;
    Ok(())
}
