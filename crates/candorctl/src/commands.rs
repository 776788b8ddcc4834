//! Command handlers for candorctl.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

use candor_common::config::{ConfigFile, ConfigResolver};
use candor_common::{notes, paths};

/// Handle status command
pub fn status() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let resolver = ConfigResolver::for_cwd(&cwd);
    // Administrative view always reads fresh, never a cached burst value
    let resolved = resolver.resolve_fresh();

    println!();
    println!("{}", format!("candorctl v{}", env!("CARGO_PKG_VERSION")).bold());
    println!();
    print_kv("minConfidence", &format!("{}%", resolved.min_confidence));
    print_kv("verbose", if resolved.verbose { "on" } else { "off" });
    println!();
    print_file_entry("local config", Some(resolver.local_path().to_path_buf()));
    print_file_entry("global config", resolver.global_path().map(Path::to_path_buf));
    print_file_entry("notes log", paths::notes_path());
    print_file_entry("debug log", paths::debug_log_path(&cwd));

    Ok(())
}

fn print_kv(key: &str, value: &str) {
    println!("  {:16} {}", key.dimmed(), value);
}

fn print_file_entry(label: &str, path: Option<PathBuf>) {
    let Some(path) = path else {
        println!("  {:16} {}", label.dimmed(), "unresolved".red());
        return;
    };
    let state = match std::fs::metadata(&path) {
        Ok(meta) => format!("{} ({} bytes)", "present".green(), meta.len()),
        Err(_) => "absent".yellow().to_string(),
    };
    println!("  {:16} {}  {}", label.dimmed(), path.display(), state);
}

/// Handle config command: show settings, or apply one `key=value` pair
pub fn config(set: Option<String>, local: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = if local {
        paths::local_config_path(&cwd)
    } else {
        paths::global_config_path().context("could not resolve home directory")?
    };

    let Some(set) = set else {
        return status();
    };

    let mut file = ConfigFile::load(&path).unwrap_or_default();
    apply_set(&mut file, &set)?;
    file.last_updated = Some(Utc::now().to_rfc3339());
    file.save(&path)
        .with_context(|| format!("writing {}", path.display()))?;

    // Hooks run as separate processes with their own cache; they pick
    // up the new value within the TTL.
    println!("{} {}", "updated".green(), path.display());
    Ok(())
}

/// Parse and apply one `key=value` assignment
fn apply_set(file: &mut ConfigFile, set: &str) -> Result<()> {
    let Some((key, value)) = set.split_once('=') else {
        bail!("expected key=value, got '{set}'");
    };

    match key.trim() {
        "minConfidence" | "min-confidence" => {
            let threshold: u8 = value
                .trim()
                .parse()
                .with_context(|| format!("'{value}' is not an integer"))?;
            if threshold > 100 {
                bail!("minConfidence must be 0-100, got {threshold}");
            }
            file.min_confidence = Some(threshold);
        }
        "verbose" => {
            let verbose: bool = value
                .trim()
                .parse()
                .with_context(|| format!("'{value}' is not true/false"))?;
            file.verbose = Some(verbose);
        }
        other => bail!("unknown setting '{other}' (expected minConfidence or verbose)"),
    }
    Ok(())
}

/// Handle note command
pub fn note(message: String) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        bail!("note text must not be empty");
    }
    let path = paths::notes_path().context("could not resolve home directory")?;
    let cwd = std::env::current_dir()?;
    let entry = notes::append(&path, message, &cwd.to_string_lossy())?;
    println!("{} note {}", "added".green(), entry.id.dimmed());
    Ok(())
}

/// Handle notes command
pub fn notes(limit: usize) -> Result<()> {
    let path = paths::notes_path().context("could not resolve home directory")?;
    let entries = notes::load(&path);
    if entries.is_empty() {
        println!("no notes recorded");
        return Ok(());
    }
    for entry in entries.iter().take(limit) {
        println!(
            "{}  {}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M").dimmed(),
            entry.message,
            entry.cwd.dimmed()
        );
    }
    Ok(())
}
