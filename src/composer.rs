//! Workout authoring state.
//!
//! [`WorkoutComposer`] owns one [`WorkoutDraft`] and exposes the mutations a
//! front end needs while the user builds a workout: add and remove entries,
//! tweak sets/reps/resistance, flip rep and resistance modes. [`rep_display`],
//! [`summary`] and [`sets_preview`] derive the text shown for an entry.
//!
//! [`WorkoutComposer::save`] validates the draft and writes it in two steps
//! through the injected [`WorkoutBackend`]: the workout row first, then all
//! of its exercises in one bulk insert. The steps are not transactional; see
//! [`ComposerOptions::rollback_orphans`].

use tracing::{debug, info, warn};

use crate::backend::WorkoutBackend;
use crate::error::SaveError;
use crate::models::{
    CatalogExercise, EntryId, NewWorkout, RepTarget, Resistance, WorkoutDraft, WorkoutExerciseEntry,
    WorkoutExerciseRow, WorkoutRecord,
};

/// Placeholder for an empty numeric field.
pub const EMPTY: &str = "—";
/// Shown instead of a load for bodyweight entries.
pub const BODYWEIGHT: &str = "BW";
/// Most rows [`sets_preview`] produces for one entry.
pub const PREVIEW_LIMIT: u32 = 12;

/// A single typed field edit. Edits that don't fit the entry's current mode
/// are refused rather than silently creating a second mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryUpdate {
    Sets(u32),
    Reps(String),
    RepsMin(String),
    RepsMax(String),
    Resistance(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposerOptions {
    /// Delete the freshly inserted workout again when its exercises fail to
    /// save. Off by default: the workout row is left behind with no exercises.
    pub rollback_orphans: bool,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedWorkout {
    pub workout: WorkoutRecord,
    pub exercises: usize,
}

/// One row of the per-set preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPreview {
    pub number: u32,
    pub reps: String,
    pub resistance: String,
}

impl std::fmt::Display for SetPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>2}  {} × {}", self.number, self.reps, self.resistance)
    }
}

pub struct WorkoutComposer<B> {
    backend: B,
    owner_id: String,
    options: ComposerOptions,
    draft: WorkoutDraft,
}

impl<B: WorkoutBackend> WorkoutComposer<B> {
    pub fn new(backend: B, owner_id: impl Into<String>) -> Self {
        Self::with_options(backend, owner_id, ComposerOptions::default())
    }

    pub fn with_options(backend: B, owner_id: impl Into<String>, options: ComposerOptions) -> Self {
        Self {
            backend,
            owner_id: owner_id.into(),
            options,
            draft: WorkoutDraft::default(),
        }
    }

    pub fn draft(&self) -> &WorkoutDraft {
        &self.draft
    }

    pub fn entries(&self) -> &[WorkoutExerciseEntry] {
        &self.draft.exercises
    }

    pub fn entry(&self, id: EntryId) -> Option<&WorkoutExerciseEntry> {
        self.draft.exercises.iter().find(|e| e.key == id)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    /// Append a new entry with 3 sets, empty fixed reps and an empty load.
    /// The same catalog exercise may be added more than once; each entry
    /// gets its own key.
    pub fn add_exercise(&mut self, exercise: &CatalogExercise) -> EntryId {
        let entry = WorkoutExerciseEntry::from_catalog(exercise);
        let key = entry.key;
        debug!(entry = %key, exercise = %exercise.id, "adding exercise");
        self.draft.exercises.push(entry);
        key
    }

    /// Returns `false` (and changes nothing) when no entry has this key.
    pub fn remove_exercise(&mut self, id: EntryId) -> bool {
        match self.draft.exercises.iter().position(|e| e.key == id) {
            Some(idx) => {
                self.draft.exercises.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn toggle_collapse(&mut self, id: EntryId) -> bool {
        self.with_entry(id, |e| e.collapsed = !e.collapsed)
    }

    /// Apply one field edit. Returns `false` when the entry is missing or
    /// the field belongs to the mode the entry is not in.
    pub fn update_field(&mut self, id: EntryId, update: EntryUpdate) -> bool {
        let Some(entry) = self.draft.exercises.iter_mut().find(|e| e.key == id) else {
            return false;
        };

        match (update, &mut entry.reps, &mut entry.resistance) {
            (EntryUpdate::Sets(n), _, _) => {
                entry.sets = n.max(1);
                true
            }
            (EntryUpdate::Reps(v), RepTarget::Fixed { reps }, _) => {
                *reps = v;
                true
            }
            (EntryUpdate::RepsMin(v), RepTarget::Range { min, .. }, _) => {
                *min = v;
                true
            }
            (EntryUpdate::RepsMax(v), RepTarget::Range { max, .. }, _) => {
                *max = v;
                true
            }
            (EntryUpdate::Resistance(v), _, Resistance::Loaded { value }) => {
                *value = v;
                true
            }
            (update, _, _) => {
                warn!(entry = %id, ?update, "update does not match the entry's mode");
                false
            }
        }
    }

    /// Fixed → range moves the rep value into `min`; range → fixed moves
    /// `min` back and drops `max`.
    pub fn toggle_rep_mode(&mut self, id: EntryId) -> bool {
        self.with_entry(id, |e| {
            e.reps = match std::mem::replace(
                &mut e.reps,
                RepTarget::Fixed {
                    reps: String::new(),
                },
            ) {
                RepTarget::Fixed { reps } => RepTarget::Range {
                    min: reps,
                    max: String::new(),
                },
                RepTarget::Range { min, .. } => RepTarget::Fixed { reps: min },
            };
        })
    }

    /// The load is not carried across: switching to bodyweight drops it and
    /// switching back starts from an empty value.
    pub fn toggle_resistance_mode(&mut self, id: EntryId) -> bool {
        self.with_entry(id, |e| {
            e.resistance = match e.resistance {
                Resistance::BodyWeight => Resistance::Loaded {
                    value: String::new(),
                },
                Resistance::Loaded { .. } => Resistance::BodyWeight,
            };
        })
    }

    pub fn sets_increment(&mut self, id: EntryId) -> bool {
        self.with_entry(id, |e| e.sets = e.sets.saturating_add(1))
    }

    /// Never goes below one set.
    pub fn sets_decrement(&mut self, id: EntryId) -> bool {
        self.with_entry(id, |e| e.sets = e.sets.saturating_sub(1).max(1))
    }

    /// Discard the draft.
    pub fn reset(&mut self) {
        self.draft = WorkoutDraft::default();
    }

    fn with_entry(&mut self, id: EntryId, f: impl FnOnce(&mut WorkoutExerciseEntry)) -> bool {
        match self.draft.exercises.iter_mut().find(|e| e.key == id) {
            Some(entry) => {
                f(entry);
                debug!(entry = %id, "entry updated");
                true
            }
            None => false,
        }
    }

    /// Validate and persist the draft, then clear it.
    ///
    /// Validation failures never reach the backend. If the workout insert
    /// fails or returns nothing, no exercises are written. If the exercise
    /// insert fails the workout row stays (unless `rollback_orphans` is on)
    /// and the draft is kept so the user can retry.
    pub async fn save(&mut self) -> Result<SavedWorkout, SaveError> {
        if self.draft.name.trim().is_empty() {
            return Err(SaveError::MissingName);
        }
        if self.draft.exercises.is_empty() {
            return Err(SaveError::NoExercises);
        }

        let new = NewWorkout {
            owner_id: self.owner_id.clone(),
            name: self.draft.name.clone(),
        };
        let workout = match self.backend.insert_workout(&new).await {
            Ok(Some(workout)) => workout,
            Ok(None) => {
                warn!(name = %new.name, "workout insert returned no row");
                return Err(SaveError::WorkoutNotReturned);
            }
            Err(e) => {
                warn!(name = %new.name, error = %e, "workout insert failed");
                return Err(SaveError::WorkoutSaveFailed(e));
            }
        };

        let rows: Vec<WorkoutExerciseRow> = self
            .draft
            .exercises
            .iter()
            .enumerate()
            .map(|(idx, entry)| WorkoutExerciseRow::from_entry(&workout.id, idx as u32, entry))
            .collect();

        if let Err(source) = self.backend.insert_workout_exercises(&rows).await {
            warn!(workout = %workout.id, error = %source, "exercise insert failed");
            let rolled_back = self.options.rollback_orphans && self.rollback(&workout.id).await;
            return Err(SaveError::ExercisesSaveFailed {
                workout_id: workout.id,
                source,
                rolled_back,
            });
        }

        info!(workout = %workout.id, exercises = rows.len(), "workout saved");
        self.reset();
        Ok(SavedWorkout {
            workout,
            exercises: rows.len(),
        })
    }

    async fn rollback(&self, workout_id: &str) -> bool {
        match self.backend.delete_workout(workout_id).await {
            Ok(()) => {
                info!(workout = %workout_id, "removed orphaned workout");
                true
            }
            Err(e) => {
                warn!(workout = %workout_id, error = %e, "could not remove orphaned workout");
                false
            }
        }
    }
}

/// `"<min>-<max>"` for a range, otherwise the rep value; empty parts show
/// as `—`.
pub fn rep_display(entry: &WorkoutExerciseEntry) -> String {
    match &entry.reps {
        RepTarget::Range { min, max } => format!("{}-{}", or_empty(min), or_empty(max)),
        RepTarget::Fixed { reps } => or_empty(reps).to_string(),
    }
}

/// `BW` for bodyweight, otherwise the load or `—`.
pub fn resistance_display(entry: &WorkoutExerciseEntry) -> String {
    match &entry.resistance {
        Resistance::BodyWeight => BODYWEIGHT.to_string(),
        Resistance::Loaded { value } => or_empty(value).to_string(),
    }
}

/// One-line description used for collapsed entries, e.g. `3 sets × 8-12 × BW`.
pub fn summary(entry: &WorkoutExerciseEntry) -> String {
    format!(
        "{} sets × {} × {}",
        entry.sets,
        rep_display(entry),
        resistance_display(entry)
    )
}

/// One row per set, numbered from 1. Stops after [`PREVIEW_LIMIT`] rows; the
/// caller compares against `entry.sets` to tell how many were left out.
pub fn sets_preview(entry: &WorkoutExerciseEntry) -> Vec<SetPreview> {
    let reps = rep_display(entry);
    let resistance = resistance_display(entry);
    (1..=entry.sets.min(PREVIEW_LIMIT))
        .map(|number| SetPreview {
            number,
            reps: reps.clone(),
            resistance: resistance.clone(),
        })
        .collect()
}

fn or_empty(s: &str) -> &str {
    if s.is_empty() { EMPTY } else { s }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::BackendError;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        InsertWorkout(NewWorkout),
        InsertExercises(Vec<WorkoutExerciseRow>),
        Delete(String),
    }

    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<Call>>,
        fail_workout: bool,
        no_row: bool,
        fail_exercises: bool,
    }

    impl FakeBackend {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn rejected() -> BackendError {
        BackendError::Rejected {
            status: 500,
            message: "unavailable".into(),
        }
    }

    #[async_trait]
    impl WorkoutBackend for FakeBackend {
        async fn insert_workout(&self, record: &NewWorkout) -> Result<Option<WorkoutRecord>, BackendError> {
            self.calls.lock().unwrap().push(Call::InsertWorkout(record.clone()));
            if self.fail_workout {
                return Err(rejected());
            }
            if self.no_row {
                return Ok(None);
            }
            Ok(Some(WorkoutRecord {
                id: "w1".into(),
                owner_id: Some(record.owner_id.clone()),
                name: record.name.clone(),
                created_at: None,
            }))
        }

        async fn insert_workout_exercises(&self, rows: &[WorkoutExerciseRow]) -> Result<(), BackendError> {
            self.calls.lock().unwrap().push(Call::InsertExercises(rows.to_vec()));
            if self.fail_exercises { Err(rejected()) } else { Ok(()) }
        }

        async fn delete_workout(&self, workout_id: &str) -> Result<(), BackendError> {
            self.calls.lock().unwrap().push(Call::Delete(workout_id.to_string()));
            Ok(())
        }
    }

    fn exercise(id: &str, name: &str) -> CatalogExercise {
        CatalogExercise {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }

    fn composer(backend: FakeBackend) -> WorkoutComposer<FakeBackend> {
        WorkoutComposer::new(backend, "user-1")
    }

    /// `Leg Day` with one squat entry: 3 × 10 × 135.
    fn leg_day(backend: FakeBackend) -> WorkoutComposer<FakeBackend> {
        let mut c = composer(backend);
        c.rename("Leg Day");
        let id = c.add_exercise(&exercise("sq1", "Back Squat"));
        assert!(c.update_field(id, EntryUpdate::Reps("10".into())));
        assert!(c.update_field(id, EntryUpdate::Resistance("135".into())));
        c
    }

    #[test]
    fn decrement_floors_at_one() {
        let mut c = composer(FakeBackend::default());
        let id = c.add_exercise(&exercise("sq1", "Back Squat"));

        for _ in 0..5 {
            c.sets_decrement(id);
        }
        assert_eq!(c.entry(id).unwrap().sets, 1);

        for expected in 2..=6 {
            c.sets_increment(id);
            assert_eq!(c.entry(id).unwrap().sets, expected);
        }
    }

    #[test]
    fn sets_update_is_clamped() {
        let mut c = composer(FakeBackend::default());
        let id = c.add_exercise(&exercise("sq1", "Back Squat"));
        assert!(c.update_field(id, EntryUpdate::Sets(0)));
        assert_eq!(c.entry(id).unwrap().sets, 1);
    }

    #[test]
    fn rep_mode_round_trip_keeps_fixed_value() {
        let mut c = composer(FakeBackend::default());
        let id = c.add_exercise(&exercise("sq1", "Back Squat"));
        c.update_field(id, EntryUpdate::Reps("10".into()));

        c.toggle_rep_mode(id);
        assert_eq!(
            c.entry(id).unwrap().reps,
            RepTarget::Range {
                min: "10".into(),
                max: String::new()
            }
        );

        c.toggle_rep_mode(id);
        assert_eq!(c.entry(id).unwrap().reps, RepTarget::Fixed { reps: "10".into() });
    }

    #[test]
    fn rep_mode_round_trip_drops_max() {
        let mut c = composer(FakeBackend::default());
        let id = c.add_exercise(&exercise("sq1", "Back Squat"));
        c.toggle_rep_mode(id);
        c.update_field(id, EntryUpdate::RepsMin("8".into()));
        c.update_field(id, EntryUpdate::RepsMax("12".into()));

        c.toggle_rep_mode(id);
        c.toggle_rep_mode(id);
        assert_eq!(
            c.entry(id).unwrap().reps,
            RepTarget::Range {
                min: "8".into(),
                max: String::new()
            }
        );
    }

    #[test]
    fn resistance_toggle_discards_load() {
        let mut c = composer(FakeBackend::default());
        let id = c.add_exercise(&exercise("pu1", "Pull-up"));
        c.update_field(id, EntryUpdate::Resistance("25".into()));

        c.toggle_resistance_mode(id);
        assert_eq!(c.entry(id).unwrap().resistance, Resistance::BodyWeight);

        c.toggle_resistance_mode(id);
        assert_eq!(
            c.entry(id).unwrap().resistance,
            Resistance::Loaded { value: String::new() }
        );
    }

    #[test]
    fn mismatched_update_is_refused() {
        let mut c = composer(FakeBackend::default());
        let id = c.add_exercise(&exercise("sq1", "Back Squat"));
        let before = c.entry(id).unwrap().clone();

        assert!(!c.update_field(id, EntryUpdate::RepsMin("8".into())));
        c.toggle_resistance_mode(id);
        assert!(!c.update_field(id, EntryUpdate::Resistance("100".into())));
        assert_eq!(c.entry(id).unwrap().reps, before.reps);
        assert_eq!(c.entry(id).unwrap().resistance, Resistance::BodyWeight);
    }

    #[test]
    fn toggle_collapse_touches_nothing_else() {
        let mut c = composer(FakeBackend::default());
        let id = c.add_exercise(&exercise("sq1", "Back Squat"));
        let mut expected = c.entry(id).unwrap().clone();

        assert!(c.toggle_collapse(id));
        expected.collapsed = true;
        assert_eq!(c.entry(id).unwrap(), &expected);
    }

    #[test]
    fn removing_unknown_entry_is_a_noop() {
        let mut c = composer(FakeBackend::default());
        c.add_exercise(&exercise("sq1", "Back Squat"));
        let before = c.draft().clone();

        assert!(!c.remove_exercise(EntryId::new()));
        assert_eq!(c.draft(), &before);
    }

    #[test]
    fn duplicate_exercises_are_edited_independently() {
        let mut c = composer(FakeBackend::default());
        let bench = exercise("bp1", "Bench Press");
        let first = c.add_exercise(&bench);
        let second = c.add_exercise(&bench);

        c.sets_increment(second);
        assert_eq!(c.entry(first).unwrap().sets, 3);
        assert_eq!(c.entry(second).unwrap().sets, 4);

        assert!(c.remove_exercise(first));
        assert_eq!(c.entries().len(), 1);
        assert_eq!(c.entries()[0].key, second);
    }

    #[test]
    fn rep_display_placeholders() {
        let mut entry = WorkoutExerciseEntry::from_catalog(&exercise("sq1", "Back Squat"));
        assert_eq!(rep_display(&entry), "—");

        entry.reps = RepTarget::Range {
            min: "8".into(),
            max: String::new(),
        };
        assert_eq!(rep_display(&entry), "8-—");

        entry.reps = RepTarget::Range {
            min: String::new(),
            max: String::new(),
        };
        assert_eq!(rep_display(&entry), "—-—");
    }

    #[test]
    fn summary_shows_bw_or_load() {
        let mut entry = WorkoutExerciseEntry::from_catalog(&exercise("sq1", "Back Squat"));
        entry.reps = RepTarget::Fixed { reps: "10".into() };
        entry.resistance = Resistance::Loaded { value: "135".into() };
        assert_eq!(summary(&entry), "3 sets × 10 × 135");

        entry.resistance = Resistance::BodyWeight;
        entry.reps = RepTarget::Range {
            min: "8".into(),
            max: "12".into(),
        };
        assert_eq!(summary(&entry), "3 sets × 8-12 × BW");

        entry.resistance = Resistance::Loaded { value: String::new() };
        assert_eq!(summary(&entry), "3 sets × 8-12 × —");
    }

    #[test]
    fn preview_has_one_line_per_set() {
        let mut entry = WorkoutExerciseEntry::from_catalog(&exercise("sq1", "Back Squat"));
        entry.sets = 2;
        entry.reps = RepTarget::Fixed { reps: "5".into() };
        entry.resistance = Resistance::Loaded { value: "225".into() };

        let preview = sets_preview(&entry);
        assert_eq!(preview.len(), 2);
        assert_eq!(preview[1].number, 2);
        assert_eq!(preview[1].to_string(), " 2  5 × 225");
    }

    #[test]
    fn preview_stops_at_limit() {
        let mut entry = WorkoutExerciseEntry::from_catalog(&exercise("sq1", "Back Squat"));
        entry.sets = u32::MAX;

        let preview = sets_preview(&entry);
        assert_eq!(preview.len(), PREVIEW_LIMIT as usize);
        assert_eq!(preview.last().map(|p| p.number), Some(PREVIEW_LIMIT));
        assert_eq!(summary(&entry), format!("{} sets × — × —", u32::MAX));
    }

    #[tokio::test]
    async fn blank_name_never_reaches_backend() {
        let mut c = composer(FakeBackend::default());
        c.rename("   ");
        c.add_exercise(&exercise("sq1", "Back Squat"));

        let err = c.save().await.unwrap_err();
        assert!(matches!(err, SaveError::MissingName));
        assert!(c.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn empty_exercise_list_never_reaches_backend() {
        let mut c = composer(FakeBackend::default());
        c.rename("Leg Day");

        let err = c.save().await.unwrap_err();
        assert!(matches!(err, SaveError::NoExercises));
        assert!(c.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn save_writes_workout_then_exercises_and_resets() {
        let mut c = leg_day(FakeBackend::default());

        let saved = c.save().await.expect("save succeeds");
        assert_eq!(saved.workout.id, "w1");
        assert_eq!(saved.exercises, 1);

        assert_eq!(
            c.backend().calls(),
            vec![
                Call::InsertWorkout(NewWorkout {
                    owner_id: "user-1".into(),
                    name: "Leg Day".into(),
                }),
                Call::InsertExercises(vec![WorkoutExerciseRow {
                    workout_id: "w1".into(),
                    exercise_id: "sq1".into(),
                    position: 0,
                    sets: 3,
                    reps: Some("10".into()),
                    reps_min: None,
                    reps_max: None,
                    resistance_value: Some("135".into()),
                    is_bodyweight: false,
                }]),
            ]
        );
        assert_eq!(c.draft(), &WorkoutDraft::default());
    }

    #[tokio::test]
    async fn range_bodyweight_entry_is_mapped() {
        let mut c = composer(FakeBackend::default());
        c.rename("Calisthenics");
        c.add_exercise(&exercise("sq1", "Back Squat"));
        let id = c.add_exercise(&exercise("dip", "Dip"));
        c.toggle_rep_mode(id);
        c.update_field(id, EntryUpdate::RepsMin("8".into()));
        c.update_field(id, EntryUpdate::RepsMax("12".into()));
        c.toggle_resistance_mode(id);

        c.save().await.unwrap();

        let calls = c.backend().calls();
        let Call::InsertExercises(rows) = &calls[1] else {
            panic!("expected exercise insert, got {calls:?}");
        };
        let dip = &rows[1];
        assert_eq!(dip.position, 1);
        assert_eq!(dip.reps, None);
        assert_eq!(dip.reps_min.as_deref(), Some("8"));
        assert_eq!(dip.reps_max.as_deref(), Some("12"));
        assert_eq!(dip.resistance_value, None);
        assert!(dip.is_bodyweight);
    }

    #[tokio::test]
    async fn failed_workout_insert_stops_before_exercises() {
        let mut c = leg_day(FakeBackend {
            fail_workout: true,
            ..Default::default()
        });
        let before = c.draft().clone();

        let err = c.save().await.unwrap_err();
        assert!(matches!(err, SaveError::WorkoutSaveFailed(_)));
        assert_eq!(c.backend().calls().len(), 1);
        assert_eq!(c.draft(), &before);
    }

    #[tokio::test]
    async fn missing_workout_row_stops_before_exercises() {
        let mut c = leg_day(FakeBackend {
            no_row: true,
            ..Default::default()
        });

        let err = c.save().await.unwrap_err();
        assert!(matches!(err, SaveError::WorkoutNotReturned));
        assert_eq!(c.backend().calls().len(), 1);
        assert_eq!(c.draft().name, "Leg Day");
    }

    #[tokio::test]
    async fn failed_exercise_insert_leaves_orphan_by_default() {
        let mut c = leg_day(FakeBackend {
            fail_exercises: true,
            ..Default::default()
        });

        let err = c.save().await.unwrap_err();
        let SaveError::ExercisesSaveFailed {
            workout_id,
            rolled_back,
            ..
        } = err
        else {
            panic!("expected an exercise save failure");
        };
        assert_eq!(workout_id, "w1");
        assert!(!rolled_back);
        assert!(
            !c.backend()
                .calls()
                .iter()
                .any(|call| matches!(call, Call::Delete(_)))
        );
        assert_eq!(c.entries().len(), 1);
    }

    #[tokio::test]
    async fn rollback_option_deletes_orphan() {
        let backend = FakeBackend {
            fail_exercises: true,
            ..Default::default()
        };
        let mut c = WorkoutComposer::with_options(
            backend,
            "user-1",
            ComposerOptions {
                rollback_orphans: true,
            },
        );
        c.rename("Leg Day");
        c.add_exercise(&exercise("sq1", "Back Squat"));

        let err = c.save().await.unwrap_err();
        assert!(matches!(
            err,
            SaveError::ExercisesSaveFailed {
                rolled_back: true,
                ..
            }
        ));
        assert_eq!(c.backend().calls().last(), Some(&Call::Delete("w1".into())));
    }
}
