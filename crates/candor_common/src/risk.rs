//! Action risk classification.
//!
//! Maps a turn's tool invocations to a risk tier: what happens if the
//! assistant is wrong? Deletion, overwrites, and arbitrary command
//! execution are high; recoverable transformations are medium; pure
//! reads are low. Static lookup over action names plus a small set of
//! destructive argument patterns; no scoring involved.

use serde::Serialize;

use crate::transcript::ActionCall;

/// Action names that can destroy or overwrite data or run arbitrary
/// system commands
const HIGH_RISK_NAMES: &[&str] = &["delete", "remove", "write", "bash", "shell", "exec"];

/// Data-transforming but recoverable actions
const MEDIUM_RISK_NAMES: &[&str] = &["edit", "patch", "replace", "task", "fetch", "agent"];

/// Destructive patterns inside serialized arguments. Catches shell
/// commands routed through otherwise generic execution tools.
const DESTRUCTIVE_ARG_PATTERNS: &[&str] = &[
    "rm ", "rm -", "sudo ", "mv ", "chmod", "chown", "mkfs", "dd if=", "truncate", "> /dev/",
];

/// Potential consequence tier of the actions in a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one action by name and arguments
fn classify_action(action: &ActionCall) -> RiskTier {
    let name = action.name.to_lowercase();

    if HIGH_RISK_NAMES.iter().any(|marker| name.contains(marker)) {
        return RiskTier::High;
    }

    let args = action.arguments.to_string().to_lowercase();
    if DESTRUCTIVE_ARG_PATTERNS
        .iter()
        .any(|pattern| args.contains(pattern))
    {
        return RiskTier::High;
    }

    if MEDIUM_RISK_NAMES.iter().any(|marker| name.contains(marker)) {
        return RiskTier::Medium;
    }

    RiskTier::Low
}

/// Classify a full action list: the highest tier among the actions.
/// No actions at all is low risk by definition.
pub fn classify(actions: &[ActionCall]) -> RiskTier {
    actions
        .iter()
        .map(classify_action)
        .max()
        .unwrap_or(RiskTier::Low)
}
