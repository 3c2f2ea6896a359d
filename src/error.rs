use thiserror::Error;

/// Failure reported by a data-access backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote answered, but not with a 2xx.
    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Why a save attempt stopped. Every variant short-circuits the remaining
/// writes of that attempt.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("workout name is empty")]
    MissingName,

    #[error("workout has no exercises")]
    NoExercises,

    #[error("failed to insert workout: {0}")]
    WorkoutSaveFailed(#[source] BackendError),

    #[error("workout insert returned no row")]
    WorkoutNotReturned,

    /// The workout row exists; its exercises do not. `rolled_back` tells
    /// whether the orphan was deleted again.
    #[error("failed to insert exercises for workout {workout_id}: {source}")]
    ExercisesSaveFailed {
        workout_id: String,
        #[source]
        source: BackendError,
        rolled_back: bool,
    },
}

impl SaveError {
    /// Text of the blocking notice shown to the user.
    pub fn notice(&self) -> &'static str {
        match self {
            Self::MissingName => "Please enter a workout name",
            Self::NoExercises => "Please add at least one exercise",
            Self::WorkoutSaveFailed(_) | Self::WorkoutNotReturned => "Failed to save workout",
            Self::ExercisesSaveFailed { .. } => "Failed to save exercises",
        }
    }

    /// Local validation failure; no backend call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingName | Self::NoExercises)
    }
}
