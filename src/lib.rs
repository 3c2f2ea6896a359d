//! Compose named workouts from an exercise catalog and persist them.
//!
//! The heart of the crate is [`composer::WorkoutComposer`], which holds the
//! draft being edited and saves it through a [`backend::WorkoutBackend`].
//! The remaining modules supply the stores, configuration and the
//! command-line front end.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod composer;
pub mod db;
pub mod error;
pub mod models;
pub mod types;
pub mod utils;
