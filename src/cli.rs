use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "setlist", version, about = "Compose workouts from your exercise catalog")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Emit machine-readable JSON instead of colorful text.
    #[arg(global = true, long)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a workout interactively
    #[command(visible_alias = "c")]
    Compose {
        /// Start with this workout name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Build and save a workout from a TOML file
    #[command(visible_alias = "i")]
    Import {
        /// Path to TOML file
        file: String,
    },

    /// Saved workouts
    #[command(subcommand, visible_alias = "w")]
    Workout(WorkoutCmd),

    /// Exercise catalog
    #[command(subcommand, visible_alias = "ex")]
    Exercise(ExerciseCmd),

    /// View or edit setlist config
    #[command(subcommand)]
    Config(ConfigCmd),
}

#[derive(Debug, Subcommand)]
pub enum WorkoutCmd {
    /// List saved workouts, newest first
    #[command(visible_alias = "l")]
    List,

    /// Show one workout with its exercises
    #[command(visible_alias = "s")]
    Show {
        /// Workout index (from `w list`) or id
        workout: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ExerciseCmd {
    /// Add a new exercise
    #[command(visible_alias = "a")]
    Add {
        /// Exercise name
        name: String,

        /// Exercise description
        #[arg(short, long)]
        desc: Option<String>,
    },

    /// List exercises, optionally filtered by name
    #[command(visible_alias = "l")]
    List {
        /// Case-insensitive name filter
        query: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}
