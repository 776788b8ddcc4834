//! Session notes log.
//!
//! Append-only list of short operator notes, most-recent-first, capped
//! at 20 entries. The before-prompt trigger reads the most recent few
//! to build its additional-context string; only `candorctl` writes
//! here. A missing or malformed file is an empty log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// Hard cap on stored entries
pub const MAX_NOTES: usize = 20;

/// How many entries the before-prompt trigger surfaces
pub const CONTEXT_NOTES: usize = 3;

/// One note entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteEntry {
    pub id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub cwd: String,
}

/// Load the notes log, most-recent-first. Absent or malformed → empty.
pub fn load(path: &Path) -> Vec<NoteEntry> {
    let Ok(raw) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(notes) => notes,
        Err(err) => {
            debug!(path = %path.display(), %err, "malformed notes log treated as empty");
            Vec::new()
        }
    }
}

/// Prepend a note, enforce the cap, and write the log back
pub fn append(path: &Path, message: &str, cwd: &str) -> anyhow::Result<NoteEntry> {
    let entry = NoteEntry {
        id: Uuid::new_v4().to_string(),
        message: message.to_string(),
        timestamp: Utc::now(),
        cwd: cwd.to_string(),
    };

    let mut notes = load(path);
    notes.insert(0, entry.clone());
    notes.truncate(MAX_NOTES);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&notes)?)?;
    Ok(entry)
}

/// Render the most recent entries as the additional-context string
/// prepended ahead of the next user message. `None` when the log is
/// empty.
pub fn recent_context(notes: &[NoteEntry]) -> Option<String> {
    if notes.is_empty() {
        return None;
    }
    let mut context = String::from("Recent session notes:");
    for note in notes.iter().take(CONTEXT_NOTES) {
        context.push_str(&format!(
            "\n- [{}] {}",
            note.timestamp.format("%Y-%m-%d %H:%M"),
            note.message
        ));
    }
    Some(context)
}
