use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::{
    backend::{ExerciseCatalog, WorkoutBackend},
    commands::print_save_error,
    composer::{EntryUpdate, WorkoutComposer},
    models::CatalogExercise,
    types::{OutputFmt, emit},
};

#[derive(Debug, Deserialize)]
pub struct WorkoutToml {
    pub name: String,
    #[serde(default)]
    pub exercise: Vec<ExerciseToml>,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseToml {
    pub id: Option<String>,
    pub name: Option<String>,
    pub sets: Option<u32>,
    pub reps: Option<Scalar>,
    pub reps_min: Option<Scalar>,
    pub reps_max: Option<Scalar>,
    pub resistance: Option<Scalar>,
    #[serde(default)]
    pub bodyweight: bool,
}

/// Rep and load fields are text, but `reps = 10` is the natural thing to
/// write in TOML.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s,
        }
    }
}

#[derive(Serialize)]
struct ImportJson {
    id: String,
    name: String,
    exercises: usize,
}

/// Find the catalog exercise an `[[exercise]]` table refers to: by id when
/// given, otherwise by exact (case-insensitive) name.
async fn resolve(catalog: &impl ExerciseCatalog, ex: &ExerciseToml) -> Result<CatalogExercise> {
    if let Some(id) = &ex.id {
        return match catalog.find(id).await? {
            Some(found) => Ok(found),
            // The catalog may live elsewhere; trust the id.
            None => Ok(CatalogExercise {
                id: id.clone(),
                name: ex.name.clone().unwrap_or_else(|| id.clone()),
                description: None,
            }),
        };
    }

    let Some(name) = &ex.name else {
        bail!("every [[exercise]] needs an `id` or a `name`");
    };
    catalog
        .search(name)
        .await?
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .with_context(|| format!("no exercise named `{}` in the catalog", name))
}

/// Replay a parsed file through the composer's operations, leaving the
/// result in its draft.
pub async fn fill_draft<B>(
    composer: &mut WorkoutComposer<B>,
    catalog: &impl ExerciseCatalog,
    workout: WorkoutToml,
) -> Result<()>
where
    B: WorkoutBackend,
{
    composer.rename(workout.name);

    for ex in workout.exercise {
        let item = resolve(catalog, &ex).await?;
        let id = composer.add_exercise(&item);

        if let Some(sets) = ex.sets {
            composer.update_field(id, EntryUpdate::Sets(sets));
        }

        if ex.reps_min.is_some() || ex.reps_max.is_some() {
            if ex.reps.is_some() {
                bail!("`{}` sets both `reps` and a rep range", item.name);
            }
            composer.toggle_rep_mode(id);
            if let Some(min) = ex.reps_min {
                composer.update_field(id, EntryUpdate::RepsMin(min.into_text()));
            }
            if let Some(max) = ex.reps_max {
                composer.update_field(id, EntryUpdate::RepsMax(max.into_text()));
            }
        } else if let Some(reps) = ex.reps {
            composer.update_field(id, EntryUpdate::Reps(reps.into_text()));
        }

        if ex.bodyweight {
            if ex.resistance.is_some() {
                bail!("`{}` is bodyweight but also has a `resistance`", item.name);
            }
            composer.toggle_resistance_mode(id);
        } else if let Some(load) = ex.resistance {
            composer.update_field(id, EntryUpdate::Resistance(load.into_text()));
        }

        composer.toggle_collapse(id);
    }

    Ok(())
}

pub async fn handle<B>(file: &str, mut composer: WorkoutComposer<B>, fmt: OutputFmt) -> Result<()>
where
    B: WorkoutBackend + ExerciseCatalog + Clone,
{
    let path = Path::new(file);
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read file: `{}`", file))?;
    let workout: WorkoutToml = toml::from_str(&content)
        .context("Failed to parse TOML: expected `name` and `[[exercise]]` entries")?;

    let catalog = composer.backend().clone();
    fill_draft(&mut composer, &catalog, workout).await?;

    let entries = composer.entries().to_vec();
    match composer.save().await {
        Ok(saved) => {
            let out = ImportJson {
                id: saved.workout.id,
                name: saved.workout.name,
                exercises: saved.exercises,
            };
            emit(fmt, &out, || {
                println!("{} `{}`", "ok:".green().bold(), out.name);
                for (i, entry) in entries.iter().enumerate() {
                    crate::commands::print_entry(i + 1, entry);
                }
                println!(
                    "\n{} {} exercises saved ({})",
                    "Summary:".cyan().bold(),
                    out.exercises,
                    out.id.dimmed()
                );
            })
        }
        Err(e) => {
            print_save_error(&e);
            Ok(())
        }
    }
}
