use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::{
    backend::{Backend, ExerciseCatalog, WorkoutBackend},
    commands::{print_entry, print_save_error},
    composer::{ComposerOptions, EntryUpdate, WorkoutComposer},
    error::BackendError,
    models::{CatalogExercise, EntryId},
    types::{OutputFmt, emit},
};

const HELP: &str = "\
  name <text>        set the workout name
  find [query]       search the exercise catalog
  add <# | name>     add a search result (by #) or an exercise by name
  rm <n>             remove entry n
  fold <n>           collapse / expand entry n
  sets <n> +|-       one set more / less
  reps <n> <v>       fixed reps
  min <n> <v>        rep range minimum
  max <n> <v>        rep range maximum
  range <n>          switch between fixed reps and a rep range
  load <n> <v>       resistance value
  bw <n>             switch between body weight and a load
  show               print the draft
  save               save the workout
  quit               leave without saving";

/// One line of input, parsed. Entry positions are 1-based as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Name(String),
    Find(String),
    Add(String),
    Remove(usize),
    Fold(usize),
    SetsUp(usize),
    SetsDown(usize),
    Update(usize, EntryUpdate),
    ToggleRange(usize),
    ToggleBodyweight(usize),
    Show,
    Save,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs {1}")]
    Missing(&'static str, &'static str),
    #[error("`{0}` is not an entry number")]
    BadPosition(String),
    #[error("`{0}` is not a number of sets")]
    BadCount(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_action(line: &str) -> Result<Option<Action>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    let action = match cmd.to_ascii_lowercase().as_str() {
        "name" => {
            if rest.is_empty() {
                return Err(ParseError::Missing("name", "a workout name"));
            }
            Action::Name(rest.to_string())
        }
        "find" | "f" => Action::Find(rest.to_string()),
        "add" | "a" => {
            if rest.is_empty() {
                return Err(ParseError::Missing("add", "a search result number or exercise name"));
            }
            Action::Add(rest.to_string())
        }
        "rm" => Action::Remove(position("rm", rest)?),
        "fold" => Action::Fold(position("fold", rest)?),
        "range" => Action::ToggleRange(position("range", rest)?),
        "bw" => Action::ToggleBodyweight(position("bw", rest)?),
        "sets" => {
            let (pos, arg) = position_and_value("sets", rest, "an entry number and +, - or a count")?;
            match arg {
                "+" => Action::SetsUp(pos),
                "-" => Action::SetsDown(pos),
                n => Action::Update(
                    pos,
                    EntryUpdate::Sets(n.parse().map_err(|_| ParseError::BadCount(n.to_string()))?),
                ),
            }
        }
        "reps" => {
            let (pos, v) = position_and_value("reps", rest, "an entry number and a rep count")?;
            Action::Update(pos, EntryUpdate::Reps(v.to_string()))
        }
        "min" => {
            let (pos, v) = position_and_value("min", rest, "an entry number and a value")?;
            Action::Update(pos, EntryUpdate::RepsMin(v.to_string()))
        }
        "max" => {
            let (pos, v) = position_and_value("max", rest, "an entry number and a value")?;
            Action::Update(pos, EntryUpdate::RepsMax(v.to_string()))
        }
        "load" => {
            let (pos, v) = position_and_value("load", rest, "an entry number and a value")?;
            Action::Update(pos, EntryUpdate::Resistance(v.to_string()))
        }
        "show" | "ls" => Action::Show,
        "save" => Action::Save,
        "help" | "?" => Action::Help,
        "quit" | "q" | "exit" => Action::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };

    Ok(Some(action))
}

fn position(cmd: &'static str, arg: &str) -> Result<usize, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::Missing(cmd, "an entry number"));
    }
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ParseError::BadPosition(arg.to_string())),
    }
}

fn position_and_value<'a>(
    cmd: &'static str,
    rest: &'a str,
    what: &'static str,
) -> Result<(usize, &'a str), ParseError> {
    let Some((pos, value)) = rest.split_once(char::is_whitespace) else {
        return Err(ParseError::Missing(cmd, what));
    };
    Ok((position(cmd, pos)?, value.trim()))
}

#[derive(Serialize)]
struct SavedJson {
    id: String,
    name: String,
    exercises: usize,
}

/// Whether the session keeps reading input after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub async fn handle(
    name: Option<String>,
    backend: Backend,
    owner_id: &str,
    options: ComposerOptions,
    fmt: OutputFmt,
) -> Result<()> {
    let mut composer = WorkoutComposer::with_options(backend, owner_id, options);
    if let Some(name) = name {
        composer.rename(name);
    }

    // Results of the last `find`, so `add 2` can refer to them.
    let mut found: Vec<CatalogExercise> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", "Create workout".cyan().bold());
    println!("{}", "type `help` for commands".dimmed());

    loop {
        print!("{} ", ">".blue().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let action = match parse_action(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(e) => {
                println!("{} {}", "error:".red().bold(), e);
                continue;
            }
        };

        if dispatch(&mut composer, &mut found, action, fmt).await? == Flow::Quit {
            break;
        }
    }

    Ok(())
}

/// Apply one action to the draft. Backend failures are printed and leave the
/// draft as it was; only output errors end the session.
pub async fn dispatch<B>(
    composer: &mut WorkoutComposer<B>,
    found: &mut Vec<CatalogExercise>,
    action: Action,
    fmt: OutputFmt,
) -> Result<Flow>
where
    B: WorkoutBackend + ExerciseCatalog,
{
    debug!(?action, "compose action");

    match action {
        Action::Quit => return Ok(Flow::Quit),
        Action::Help => println!("{}", HELP),
        Action::Show => print_draft(composer),
        Action::Name(name) => composer.rename(name),

        Action::Find(query) => match composer.backend().search(&query).await {
            Ok(hits) => {
                *found = hits;
                if found.is_empty() {
                    println!("{}", "  (no exercises found)".dimmed());
                }
                for (i, ex) in found.iter().enumerate() {
                    println!(" {} • {}", format!("{:>2}", i + 1).yellow(), ex.name);
                }
            }
            Err(e) => print_backend_error(&e),
        },

        Action::Add(what) => match pick(composer.backend(), found.as_slice(), &what).await {
            Ok(Some(exercise)) => {
                composer.add_exercise(&exercise);
                println!("{} added `{}`", "ok:".green().bold(), exercise.name);
            }
            Ok(None) => {}
            Err(e) => print_backend_error(&e),
        },

        Action::Remove(pos) => {
            if let Some(id) = entry_at(composer, pos) {
                composer.remove_exercise(id);
            }
        }
        Action::Fold(pos) => {
            if let Some(id) = entry_at(composer, pos) {
                composer.toggle_collapse(id);
                print_entry(pos, &composer.entries()[pos - 1]);
            }
        }
        Action::SetsUp(pos) => {
            if let Some(id) = entry_at(composer, pos) {
                composer.sets_increment(id);
                print_entry(pos, &composer.entries()[pos - 1]);
            }
        }
        Action::SetsDown(pos) => {
            if let Some(id) = entry_at(composer, pos) {
                composer.sets_decrement(id);
                print_entry(pos, &composer.entries()[pos - 1]);
            }
        }
        Action::ToggleRange(pos) => {
            if let Some(id) = entry_at(composer, pos) {
                composer.toggle_rep_mode(id);
                print_entry(pos, &composer.entries()[pos - 1]);
            }
        }
        Action::ToggleBodyweight(pos) => {
            if let Some(id) = entry_at(composer, pos) {
                composer.toggle_resistance_mode(id);
                print_entry(pos, &composer.entries()[pos - 1]);
            }
        }
        Action::Update(pos, update) => {
            if let Some(id) = entry_at(composer, pos) {
                if composer.update_field(id, update) {
                    print_entry(pos, &composer.entries()[pos - 1]);
                } else {
                    println!(
                        "{} that field belongs to the other mode (toggle with `range` / `bw`)",
                        "warning:".yellow().bold()
                    );
                }
            }
        }

        Action::Save => match composer.save().await {
            Ok(saved) => {
                let out = SavedJson {
                    id: saved.workout.id.clone(),
                    name: saved.workout.name.clone(),
                    exercises: saved.exercises,
                };
                emit(fmt, &out, || {
                    println!(
                        "{} workout `{}` saved with {} exercises ({})",
                        "ok:".green().bold(),
                        out.name,
                        out.exercises,
                        out.id.dimmed()
                    );
                })?;
            }
            Err(e) => print_save_error(&e),
        },
    }

    Ok(Flow::Continue)
}

fn print_backend_error(err: &BackendError) {
    println!("{} {}", "error:".red().bold(), err);
}

fn print_draft<B: WorkoutBackend>(composer: &WorkoutComposer<B>) {
    let draft = composer.draft();
    let name = if draft.name.trim().is_empty() {
        "(unnamed)".dimmed().to_string()
    } else {
        draft.name.bold().to_string()
    };
    println!("{} {}", "Workout:".cyan().bold(), name);

    if draft.exercises.is_empty() {
        println!("{}", "  (no exercises yet)".dimmed());
    }
    for (i, entry) in draft.exercises.iter().enumerate() {
        print_entry(i + 1, entry);
    }
}

fn entry_at<B: WorkoutBackend>(composer: &WorkoutComposer<B>, pos: usize) -> Option<EntryId> {
    let id = composer.entries().get(pos - 1).map(|e| e.key);
    if id.is_none() {
        println!("{} no entry {}", "error:".red().bold(), pos);
    }
    id
}

/// Resolve `add <what>`: a number picks from the last search, anything else
/// must name exactly one catalog exercise (an exact name wins over partial
/// matches).
async fn pick(
    catalog: &impl ExerciseCatalog,
    found: &[CatalogExercise],
    what: &str,
) -> Result<Option<CatalogExercise>, BackendError> {
    if let Ok(n) = what.parse::<usize>() {
        return match n.checked_sub(1).and_then(|i| found.get(i)) {
            Some(ex) => Ok(Some(ex.clone())),
            None => {
                println!("{} no search result {} – run `find` first", "error:".red().bold(), n);
                Ok(None)
            }
        };
    }

    let hits = catalog.search(what).await?;
    if let Some(exact) = hits.iter().find(|ex| ex.name.eq_ignore_ascii_case(what)) {
        return Ok(Some(exact.clone()));
    }

    match hits.len() {
        0 => {
            println!("{} no exercise matching `{}`", "error:".red().bold(), what);
            Ok(None)
        }
        1 => Ok(hits.into_iter().next()),
        _ => {
            println!("{} `{}` matches several exercises:", "warning:".yellow().bold(), what);
            for ex in &hits {
                println!("   • {}", ex.name);
            }
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::{NewWorkout, WorkoutExerciseRow, WorkoutRecord};

    /// Store whose every call fails, as during a network outage.
    struct Offline;

    fn unavailable() -> BackendError {
        BackendError::Rejected {
            status: 503,
            message: "service unavailable".into(),
        }
    }

    #[async_trait]
    impl WorkoutBackend for Offline {
        async fn insert_workout(&self, _: &NewWorkout) -> Result<Option<WorkoutRecord>, BackendError> {
            Err(unavailable())
        }

        async fn insert_workout_exercises(&self, _: &[WorkoutExerciseRow]) -> Result<(), BackendError> {
            Err(unavailable())
        }

        async fn delete_workout(&self, _: &str) -> Result<(), BackendError> {
            Err(unavailable())
        }
    }

    #[async_trait]
    impl ExerciseCatalog for Offline {
        async fn search(&self, _: &str) -> Result<Vec<CatalogExercise>, BackendError> {
            Err(unavailable())
        }

        async fn find(&self, _: &str) -> Result<Option<CatalogExercise>, BackendError> {
            Err(unavailable())
        }

        async fn add(&self, _: &str, _: Option<&str>) -> Result<CatalogExercise, BackendError> {
            Err(unavailable())
        }
    }

    #[tokio::test]
    async fn backend_failures_keep_the_session_and_draft() {
        let mut composer = WorkoutComposer::new(Offline, "u1");
        composer.rename("Leg Day");
        composer.add_exercise(&CatalogExercise {
            id: "sq1".into(),
            name: "Back Squat".into(),
            description: None,
        });
        let mut found = Vec::new();

        for action in [
            Action::Find("press".into()),
            Action::Add("Bench Press".into()),
            Action::Save,
        ] {
            let flow = dispatch(&mut composer, &mut found, action, OutputFmt::Text)
                .await
                .unwrap();
            assert_eq!(flow, Flow::Continue);
        }

        assert_eq!(composer.draft().name, "Leg Day");
        assert_eq!(composer.entries().len(), 1);
        assert_eq!(composer.entries()[0].name, "Back Squat");
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn quit_ends_the_session() {
        let mut composer = WorkoutComposer::new(Offline, "u1");
        let flow = dispatch(&mut composer, &mut Vec::new(), Action::Quit, OutputFmt::Text)
            .await
            .unwrap();
        assert_eq!(flow, Flow::Quit);
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(parse_action("   "), Ok(None));
    }

    #[test]
    fn name_keeps_inner_spaces() {
        assert_eq!(
            parse_action("name  Leg Day  "),
            Ok(Some(Action::Name("Leg Day".into())))
        );
    }

    #[test]
    fn sets_accepts_step_or_count() {
        assert_eq!(parse_action("sets 2 +"), Ok(Some(Action::SetsUp(2))));
        assert_eq!(parse_action("sets 1 -"), Ok(Some(Action::SetsDown(1))));
        assert_eq!(
            parse_action("sets 1 5"),
            Ok(Some(Action::Update(1, EntryUpdate::Sets(5))))
        );
        assert_eq!(
            parse_action("sets 1 many"),
            Err(ParseError::BadCount("many".into()))
        );
    }

    #[test]
    fn field_edits_map_to_updates() {
        assert_eq!(
            parse_action("MIN 3 8"),
            Ok(Some(Action::Update(3, EntryUpdate::RepsMin("8".into()))))
        );
        assert_eq!(
            parse_action("load 1 135 lbs"),
            Ok(Some(Action::Update(1, EntryUpdate::Resistance("135 lbs".into()))))
        );
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse_action("rm 0"), Err(ParseError::BadPosition("0".into())));
        assert_eq!(parse_action("bw x"), Err(ParseError::BadPosition("x".into())));
        assert_eq!(
            parse_action("range"),
            Err(ParseError::Missing("range", "an entry number"))
        );
        assert_eq!(parse_action("range 4"), Ok(Some(Action::ToggleRange(4))));
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(
            parse_action("deadlift 5"),
            Err(ParseError::Unknown("deadlift".into()))
        );
    }

    #[test]
    fn find_without_query_lists_all() {
        assert_eq!(parse_action("find"), Ok(Some(Action::Find(String::new()))));
    }
}
