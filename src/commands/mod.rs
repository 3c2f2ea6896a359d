pub mod compose;
pub mod config;
pub mod exercise;
pub mod import;
pub mod workout;

use anyhow::Result;
use colored::Colorize;

use crate::{
    backend::{Backend, RestBackend, SqliteBackend},
    composer::{rep_display, resistance_display, sets_preview, summary},
    db,
    error::SaveError,
    models::{RepTarget, WorkoutExerciseEntry},
    types::{BackendKind, Config},
};

/// Open the store selected in `cfg`.
pub async fn connect(cfg: &Config) -> Result<Backend> {
    let backend = match cfg.backend()? {
        BackendKind::Sqlite => Backend::Sqlite(SqliteBackend::new(db::open(cfg.db_path()).await?)),
        BackendKind::Rest => Backend::Rest(RestBackend::new(
            cfg.rest_url()?,
            cfg.rest_key()?,
            cfg.access_token().map(str::to_string),
        )?),
    };
    Ok(backend)
}

/// Print one draft entry. Collapsed entries get the summary line, expanded
/// ones the individual controls plus a per-set preview.
pub fn print_entry(pos: usize, entry: &WorkoutExerciseEntry) {
    let marker = if entry.collapsed { "▸" } else { "▾" };
    let idx = format!("{:>2}", pos).yellow();

    if entry.collapsed {
        println!(" {} {} {}  {}", idx, marker, entry.name.bold(), summary(entry).dimmed());
        return;
    }

    println!(" {} {} {}", idx, marker, entry.name.bold());
    println!("      {:<11} {}", "Sets".dimmed(), entry.sets);
    let reps_label = match entry.reps {
        RepTarget::Fixed { .. } => "Reps",
        RepTarget::Range { .. } => "Rep range",
    };
    println!("      {:<11} {}", reps_label.dimmed(), rep_display(entry));
    let res_label = if entry.resistance.is_bodyweight() {
        "Body weight"
    } else {
        "Load"
    };
    println!("      {:<11} {}", res_label.dimmed(), resistance_display(entry));
    let preview = sets_preview(entry);
    for set in &preview {
        println!("        {}", set.to_string().dimmed());
    }
    let hidden = entry.sets as usize - preview.len();
    if hidden > 0 {
        println!("        {}", format!("… and {} more", hidden).dimmed());
    }
}

/// Report a failed save the way the user sees it, plus whatever detail
/// helps them recover.
pub fn print_save_error(err: &SaveError) {
    println!("{} {}", "error:".red().bold(), err.notice());

    match err {
        SaveError::WorkoutSaveFailed(source) => println!("  {}", source.to_string().dimmed()),
        SaveError::ExercisesSaveFailed {
            workout_id,
            source,
            rolled_back,
        } => {
            println!("  {}", source.to_string().dimmed());
            if *rolled_back {
                println!("  {} empty workout {} was removed again", "info:".blue().bold(), workout_id);
            } else {
                println!(
                    "  {} workout {} was stored without exercises",
                    "warning:".yellow().bold(),
                    workout_id
                );
            }
        }
        _ => {}
    }
}
