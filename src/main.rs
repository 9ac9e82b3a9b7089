//! Guildrank - Entry Point
//!
//! Inspect progression for XP values, replay an XP history, or export the
//! default catalogs for editing.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use guildrank::data::{default_data_dir, export_default_data, ProgressionData};
use guildrank::ProgressionCalculator;

const USAGE: &str = "\
usage:
  guildrank [--json] <xp>...      show level, rank and badges for each XP value
  guildrank replay <xp>...        treat values as one member's XP history, print level-ups
  guildrank export-data [dir]     write the default progression.ron";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("-h") | Some("--help") => {
            println!("{}", USAGE);
            Ok(())
        }
        Some("export-data") => {
            let dir = args.get(1).map(PathBuf::from).unwrap_or_else(default_data_dir);
            let path = export_default_data(&dir)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        Some("replay") => replay(&load_calculator()?, &parse_xp(&args[1..])?),
        Some(_) => {
            let json = args.iter().any(|a| a == "--json");
            let values: Vec<String> = args.iter().filter(|a| *a != "--json").cloned().collect();
            show(&load_calculator()?, &parse_xp(&values)?, json)
        }
    }
}

fn load_calculator() -> Result<ProgressionCalculator> {
    let dir = default_data_dir();
    log::info!("Using data directory {:?}", dir);
    ProgressionData::load_or_default(&dir)
        .calculator()
        .context("progression catalogs are invalid")
}

fn parse_xp(values: &[String]) -> Result<Vec<i64>> {
    if values.is_empty() {
        bail!("no XP values given\n{}", USAGE);
    }
    values
        .iter()
        .map(|v| v.parse::<i64>().with_context(|| format!("'{}' is not an XP value", v)))
        .collect()
}

fn show(calculator: &ProgressionCalculator, values: &[i64], json: bool) -> Result<()> {
    for &xp in values {
        let progress = calculator.snapshot(xp)?;
        if json {
            println!("{}", serde_json::to_string(&progress)?);
            continue;
        }
        let badges: Vec<&str> = progress.badges.iter().map(|b| b.as_str()).collect();
        let next = match progress.xp_to_next() {
            Some(missing) => format!("{} XP to level {}", missing, progress.level + 1),
            None => "max level".to_string(),
        };
        println!(
            "{:>10} XP  level {:<4} {:<8} [{:>3.0}%] {}  badges: {}",
            xp,
            progress.level,
            progress.rank,
            progress.progress_fraction() * 100.0,
            next,
            if badges.is_empty() { "-".to_string() } else { badges.join(", ") }
        );
    }
    Ok(())
}

fn replay(calculator: &ProgressionCalculator, history: &[i64]) -> Result<()> {
    let mut previous = 0;
    for &xp in history {
        match calculator.detect_level_up(previous, xp)? {
            Some(event) => {
                let badges: Vec<&str> =
                    event.newly_unlocked_badges.iter().map(|b| b.as_str()).collect();
                println!(
                    "{:>10} XP  level {} -> {} ({}{})  new badges: {}",
                    xp,
                    event.from_level,
                    event.to_level,
                    event.rank,
                    if event.rank_changed { ", new rank" } else { "" },
                    if badges.is_empty() { "-".to_string() } else { badges.join(", ") }
                );
            }
            None => println!("{:>10} XP  no level change", xp),
        }
        previous = xp;
    }
    Ok(())
}
