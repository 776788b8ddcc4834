//! Hook wire contract: what the host sends on stdin and what the gate
//! prints on stdout.
//!
//! Input fields are all optional so a host payload with extra or
//! missing keys still parses; the pipeline treats absent fields as "no
//! signal". Exit status signals the decision: 0 allows, a distinct
//! non-zero halts the turn.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Allow decisions exit with success
pub const EXIT_ALLOW: i32 = 0;

/// Block decisions exit with a distinct non-success status so the host
/// halts the turn
pub const EXIT_BLOCK: i32 = 2;

/// The three moments the host invokes the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerPoint {
    /// Before a new user message is accepted
    BeforePrompt,
    /// After the assistant completes a tool invocation
    AfterAction,
    /// When the assistant's turn fully ends
    TurnEnd,
}

impl TriggerPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerPoint::BeforePrompt => "before-prompt",
            TriggerPoint::AfterAction => "after-action",
            TriggerPoint::TurnEnd => "turn-end",
        }
    }

    /// Tag used in debug log lines
    pub fn log_tag(&self) -> &'static str {
        match self {
            TriggerPoint::BeforePrompt => "PROMPT",
            TriggerPoint::AfterAction => "POSTTOOL",
            TriggerPoint::TurnEnd => "STOP",
        }
    }

    /// Host-side event name carried in the payload
    pub fn hook_event_name(&self) -> &'static str {
        match self {
            TriggerPoint::BeforePrompt => "UserPromptSubmit",
            TriggerPoint::AfterAction => "PostToolUse",
            TriggerPoint::TurnEnd => "Stop",
        }
    }

    /// Map a host event name back to a trigger point
    pub fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "UserPromptSubmit" => Some(TriggerPoint::BeforePrompt),
            "PostToolUse" => Some(TriggerPoint::AfterAction),
            "Stop" => Some(TriggerPoint::TurnEnd),
            _ => None,
        }
    }
}

impl std::fmt::Display for TriggerPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured input the host pipes to the hook on stdin
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HookInput {
    pub transcript_path: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
    pub hook_event_name: Option<String>,
    /// Action just performed (after-action only)
    pub tool_name: Option<String>,
    pub tool_input: Option<Value>,
}

impl HookInput {
    /// Parse a stdin payload; anything unparseable is an empty input,
    /// which downstream turns into an allow decision
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }
}

/// Additional-context wrapper the host understands at before-prompt
#[derive(Debug, Clone, Serialize)]
pub struct HookSpecificOutput {
    #[serde(rename = "hookEventName")]
    pub hook_event_name: String,
    #[serde(rename = "additionalContext")]
    pub additional_context: String,
}

/// Structured decision printed to stdout
#[derive(Debug, Clone, Default, Serialize)]
pub struct HookOutput {
    pub decision: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "hookSpecificOutput", skip_serializing_if = "Option::is_none")]
    pub hook_specific_output: Option<HookSpecificOutput>,
}

impl HookOutput {
    pub fn allow() -> Self {
        Self {
            decision: "allow",
            ..Default::default()
        }
    }

    pub fn allow_with_message(message: String) -> Self {
        Self {
            decision: "allow",
            message: Some(message),
            ..Default::default()
        }
    }

    pub fn block(reason: String) -> Self {
        Self {
            decision: "block",
            reason: Some(reason),
            ..Default::default()
        }
    }

    pub fn with_additional_context(mut self, trigger: TriggerPoint, context: String) -> Self {
        self.hook_specific_output = Some(HookSpecificOutput {
            hook_event_name: trigger.hook_event_name().to_string(),
            additional_context: context,
        });
        self
    }
}
