use anyhow::{Context, Result};
use colored::Colorize;
use netpatch::Config;
use std::path::{Path, PathBuf};

use crate::cli::ConfigAction;

pub fn handle(action: ConfigAction, explicit: Option<&Path>) -> Result<()> {
    let config_path = explicit.map(PathBuf::from).unwrap_or_else(Config::default_path);

    match action {
        ConfigAction::Init => {
            if Config::init(&config_path)? {
                println!(
                    "{} Wrote default configuration to {}",
                    "✓".bright_green(),
                    config_path.display()
                );
            } else {
                println!(
                    "{} {} already exists",
                    "⚠".bright_yellow(),
                    config_path.display()
                );
            }
        }

        ConfigAction::Show => {
            let config = Config::load(explicit)?;
            let content =
                toml::to_string_pretty(&config.data).context("Failed to serialize config")?;

            println!("{} {}", "Configuration:".bright_blue().bold(), config.path.display());
            if !config.path.exists() {
                println!("  {} File not found, showing defaults", "ℹ".bright_blue());
            }
            print!("{}", content);
        }

        ConfigAction::Get { key } => {
            let config = Config::load(explicit)?;
            println!("{} = {}", key.bright_cyan(), config.get(&key)?.bright_yellow());
        }

        ConfigAction::Set { key, value } => {
            println!(
                "{} Setting {} = {}",
                "→".bright_green(),
                key.bright_cyan(),
                value.bright_yellow()
            );

            let mut config = if config_path.exists() {
                Config::load_from(&config_path)?
            } else {
                Config {
                    path: config_path.clone(),
                    ..Config::default()
                }
            };
            config.set(&key, &value)?;

            println!("{} Configuration updated", "✓".bright_green());
        }
    }

    Ok(())
}
