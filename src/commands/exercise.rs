use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::{
    backend::{Backend, ExerciseCatalog},
    cli::ExerciseCmd,
    error::BackendError,
    types::{OutputFmt, emit},
    utils::plain_len,
};

#[derive(Serialize)]
struct ExJson {
    idx: usize,
    id: String,
    name: String,
    description: String,
}

pub async fn handle(cmd: ExerciseCmd, backend: &Backend, fmt: OutputFmt) -> Result<()> {
    match cmd {
        ExerciseCmd::Add { name, desc } => {
            let name = name.trim();
            if name.is_empty() {
                println!("{} exercise name must not be empty", "error:".red().bold());
                return Ok(());
            }

            match backend.add(name, desc.as_deref()).await {
                Ok(ex) => println!(
                    "{} Exercise \"{}\" added {}",
                    "info:".blue().bold(),
                    ex.name,
                    ex.id.dimmed()
                ),
                Err(BackendError::Database(sqlx::Error::Database(db_err)))
                    if db_err.code() == Some("2067".into()) =>
                {
                    // 2067 = SQLITE_CONSTRAINT_UNIQUE
                    println!(
                        "{} Exercise \"{}\" already exists — use `ex list` to view all exercises",
                        "warning:".yellow().bold(),
                        name
                    );
                }
                Err(BackendError::Rejected { status: 409, .. }) => {
                    println!(
                        "{} Exercise \"{}\" already exists — use `ex list` to view all exercises",
                        "warning:".yellow().bold(),
                        name
                    );
                }
                Err(e) => {
                    println!("{} {}", "error:".red().bold(), e.to_string().red());
                    return Err(e.into());
                }
            }
        }

        ExerciseCmd::List { query } => {
            let found = backend.search(query.as_deref().unwrap_or("")).await?;
            let json_rows: Vec<ExJson> = found
                .into_iter()
                .enumerate()
                .map(|(i, ex)| ExJson {
                    idx: i + 1,
                    id: ex.id,
                    name: ex.name,
                    description: ex.description.unwrap_or_default(),
                })
                .collect();

            emit(fmt, &json_rows, || {
                println!("{}", "Exercises:".cyan().bold());
                if json_rows.is_empty() {
                    println!("{}", "  (no exercises found)".dimmed());
                    return;
                }

                let idx_w = json_rows.len().to_string().len();
                let left: Vec<String> = json_rows
                    .iter()
                    .map(|ex| {
                        let desc = if ex.description.is_empty() {
                            String::new()
                        } else {
                            format!("– {}", ex.description).dimmed().to_string()
                        };
                        format!(
                            " {} • {} {}",
                            format!("{:>width$}", ex.idx, width = idx_w).yellow(),
                            ex.name.bold(),
                            desc
                        )
                    })
                    .collect();

                let printable_pad = left.iter().map(|s| plain_len(s)).max().unwrap_or(0);
                for (l, ex) in left.iter().zip(&json_rows) {
                    let total_pad = printable_pad + (l.chars().count() - plain_len(l));
                    println!("{:<total_pad$} {} {}", l, "|".blue(), ex.id.dimmed(), total_pad = total_pad);
                }
            })?;
        }
    }

    Ok(())
}
