use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::{cli::ConfigCmd, types::Config};

/// Keys the application reads. Others are stored but have no effect.
const KNOWN_KEYS: &[&str] = &[
    "backend",
    "db_path",
    "rest_url",
    "rest_key",
    "access_token",
    "owner_id",
    "rollback_orphans",
];

pub async fn handle(cmd: ConfigCmd, config_path: &Path) -> Result<()> {
    let mut cfg = Config::load(config_path)?;

    match cmd {
        ConfigCmd::List => {
            if cfg.map.is_empty() {
                println!("{}", "(no config set)".dimmed());
            } else {
                println!("{}", "Config:".cyan().bold());
                for (k, v) in &cfg.map {
                    let shown = if is_secret(k) { mask(v) } else { v.clone() };
                    println!("  {} = {}", k.green(), shown);
                }
            }
        }

        ConfigCmd::Get { key } => match cfg.map.get(&key) {
            Some(val) => println!("{}", val),
            None => println!("{} key `{}` not found", "warning:".yellow().bold(), key),
        },

        ConfigCmd::Set { key, val } => {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                println!(
                    "{} `{}` is not a known key ({})",
                    "warning:".yellow().bold(),
                    key,
                    KNOWN_KEYS.join(", ")
                );
            }
            cfg.map.insert(key.clone(), val.clone());
            // Catch typos like `backend = postgress` now rather than on the next run.
            cfg.backend()?;
            cfg.composer_options()?;
            cfg.save(config_path)?;
            let shown = if is_secret(&key) { mask(&val) } else { val };
            println!("{} set `{}` = `{}`", "info:".blue().bold(), key.green(), shown);
        }

        ConfigCmd::Unset { key } => {
            if cfg.map.remove(&key).is_some() {
                cfg.save(config_path)?;
                println!("{} removed `{}`", "info:".blue().bold(), key.green());
            } else {
                println!("{} key `{}` not found", "warning:".yellow().bold(), key);
            }
        }
    }

    Ok(())
}

fn is_secret(key: &str) -> bool {
    matches!(key, "rest_key" | "access_token")
}

fn mask(val: &str) -> String {
    let visible: String = val.chars().take(4).collect();
    format!("{}…", visible)
}
