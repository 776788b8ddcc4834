//! Transcript reader.
//!
//! Reconstructs the most recent assistant turn from a JSONL session
//! transcript. Scans backward from the end and exits early at the first
//! assistant record with content, so long sessions never pay for a full
//! parse. Malformed or partially written trailing lines are skipped
//! individually. Read-only; a missing or unreadable transcript is "no
//! turn", never an error the caller has to handle.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One tool invocation performed by the assistant during its turn.
/// Only the name and arguments matter for gating; results are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCall {
    pub name: String,
    pub arguments: Value,
}

impl ActionCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// One content segment of a multi-part assistant message
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: String,
    pub text: String,
}

/// Assistant message content as it appears on the wire: either a bare
/// string or an ordered list of typed segments. Normalized into a single
/// string exactly once, here, so downstream code never branches on shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnContent {
    Text(String),
    Segments(Vec<Segment>),
}

impl TurnContent {
    /// Concatenate text segments in order, newline separated
    pub fn flatten(&self) -> String {
        match self {
            TurnContent::Text(text) => text.clone(),
            TurnContent::Segments(segments) => {
                let parts: Vec<&str> = segments
                    .iter()
                    .filter(|seg| seg.kind == "text" && !seg.text.is_empty())
                    .map(|seg| seg.text.as_str())
                    .collect();
                parts.join("\n")
            }
        }
    }
}

/// The most recent assistant-authored turn. Ephemeral: rebuilt from the
/// transcript on every invocation, never cached across turns.
#[derive(Debug, Clone)]
pub struct Turn {
    /// Normalized text content
    pub text: String,
    /// Tool invocations recorded in the same message, in order
    pub actions: Vec<ActionCall>,
    /// Zero-based line position of the record in the transcript
    pub ordinal: usize,
}

/// Find the most recent assistant turn in a JSONL transcript.
///
/// Returns `None` when the file is absent, unreadable, empty, or holds
/// no assistant record with content. All of those mean "no signal
/// available" and the gate defaults to allow.
pub fn last_assistant_turn(path: &Path) -> Option<Turn> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            debug!(path = %path.display(), %err, "transcript unreadable");
            return None;
        }
    };

    let lines: Vec<&str> = raw.lines().collect();
    for (back, line) in lines.iter().rev().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: Value = match serde_json::from_str(line) {
            Ok(record) => record,
            // Partial trailing write or corrupt line: skip, keep scanning
            Err(_) => continue,
        };
        if record["type"] != "assistant" || record["message"]["role"] != "assistant" {
            continue;
        }
        let Some(turn) = parse_assistant_record(&record, lines.len() - 1 - back) else {
            continue;
        };
        return Some(turn);
    }

    debug!(path = %path.display(), "no assistant turn found");
    None
}

/// Extract content and actions from one assistant record. Returns `None`
/// when the record carries neither text nor actions, so the backward
/// scan moves on to an earlier turn.
fn parse_assistant_record(record: &Value, ordinal: usize) -> Option<Turn> {
    let content = &record["message"]["content"];

    let (turn_content, actions) = match content {
        Value::String(text) => (TurnContent::Text(text.clone()), Vec::new()),
        Value::Array(blocks) => {
            let mut segments = Vec::new();
            let mut actions = Vec::new();
            for block in blocks {
                match block {
                    Value::String(text) => segments.push(Segment {
                        kind: "text".to_string(),
                        text: text.clone(),
                    }),
                    Value::Object(_) => {
                        let kind = block["type"].as_str().unwrap_or_default();
                        match kind {
                            "text" => segments.push(Segment {
                                kind: "text".to_string(),
                                text: block["text"].as_str().unwrap_or_default().to_string(),
                            }),
                            "tool_use" => {
                                if let Some(name) = block["name"].as_str() {
                                    actions.push(ActionCall::new(name, block["input"].clone()));
                                }
                            }
                            // Unknown block kinds contribute nothing but
                            // must not abort the record
                            other => segments.push(Segment {
                                kind: other.to_string(),
                                text: String::new(),
                            }),
                        }
                    }
                    _ => {}
                }
            }
            (TurnContent::Segments(segments), actions)
        }
        _ => return None,
    };

    let text = turn_content.flatten();
    if text.is_empty() && actions.is_empty() {
        return None;
    }

    Some(Turn {
        text,
        actions,
        ordinal,
    })
}
