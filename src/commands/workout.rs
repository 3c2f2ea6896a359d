use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::{
    backend::{Backend, ExerciseCatalog},
    cli::WorkoutCmd,
    commands::print_entry,
    composer::summary,
    models::WorkoutRecord,
    types::{OutputFmt, emit},
    utils::{plain_len, short_date},
};

#[derive(Serialize)]
struct WorkoutJson {
    idx: usize,
    id: String,
    name: String,
    created_at: String,
}

#[derive(Serialize)]
struct WorkoutDetailJson {
    id: String,
    name: String,
    created_at: String,
    exercises: Vec<WorkoutExerciseJson>,
}

#[derive(Serialize)]
struct WorkoutExerciseJson {
    position: u32,
    exercise_id: String,
    name: String,
    summary: String,
}

pub async fn handle(cmd: WorkoutCmd, backend: &Backend, fmt: OutputFmt) -> Result<()> {
    match cmd {
        WorkoutCmd::List => {
            let workouts = backend.list_workouts().await?;
            let json_rows: Vec<WorkoutJson> = workouts
                .into_iter()
                .enumerate()
                .map(|(i, w)| WorkoutJson {
                    idx: i + 1,
                    id: w.id,
                    name: w.name,
                    created_at: w.created_at.unwrap_or_default(),
                })
                .collect();

            emit(fmt, &json_rows, || {
                println!("{}", "Workouts:".cyan().bold());
                if json_rows.is_empty() {
                    println!("{}", "  (no workouts found)".dimmed());
                    return;
                }

                let idx_w = json_rows.len().to_string().len();
                let left: Vec<String> = json_rows
                    .iter()
                    .map(|w| {
                        format!(
                            " {} • {}",
                            format!("{:>width$}", w.idx, width = idx_w).yellow(),
                            w.name.bold()
                        )
                    })
                    .collect();

                let pad_plain = left.iter().map(|s| plain_len(s)).max().unwrap_or(0);
                for (l, w) in left.iter().zip(&json_rows) {
                    let pad = pad_plain + (l.chars().count() - plain_len(l));
                    println!(
                        "{:<pad$} {} {}",
                        l,
                        "|".blue(),
                        format!("saved {}", short_date(&w.created_at)).dimmed(),
                        pad = pad
                    );
                }
            })?;
        }

        WorkoutCmd::Show { workout } => {
            let Some(record) = resolve(backend, &workout).await? else {
                println!("{} no workout `{}`", "error:".red().bold(), workout);
                return Ok(());
            };

            let rows = backend.workout_exercises(&record.id).await?;
            let mut entries = Vec::with_capacity(rows.len());
            for row in rows {
                let name = match backend.find(&row.exercise_id).await? {
                    Some(ex) => ex.name,
                    None => row.exercise_id.clone(),
                };
                let position = row.position;
                entries.push((position, row.into_entry(name)));
            }

            let out = WorkoutDetailJson {
                id: record.id.clone(),
                name: record.name.clone(),
                created_at: record.created_at.clone().unwrap_or_default(),
                exercises: entries
                    .iter()
                    .map(|(position, e)| WorkoutExerciseJson {
                        position: *position,
                        exercise_id: e.exercise_id.clone(),
                        name: e.name.clone(),
                        summary: summary(e),
                    })
                    .collect(),
            };

            emit(fmt, &out, || {
                println!(
                    "{}: {}  {}",
                    "Workout".cyan().bold(),
                    out.name.bold(),
                    format!("saved {}", short_date(&out.created_at)).dimmed()
                );
                if entries.is_empty() {
                    println!("{}", "  (no exercises stored)".dimmed());
                }
                for (i, (_, entry)) in entries.iter().enumerate() {
                    print_entry(i + 1, entry);
                }
            })?;
        }
    }

    Ok(())
}

/// `w show 2` means the second row of `w list`; anything else is an id.
async fn resolve(backend: &Backend, workout: &str) -> Result<Option<WorkoutRecord>> {
    if let Ok(idx) = workout.parse::<usize>() {
        let all = backend.list_workouts().await?;
        return Ok(idx.checked_sub(1).and_then(|i| all.into_iter().nth(i)));
    }
    Ok(backend.find_workout(workout).await?)
}
