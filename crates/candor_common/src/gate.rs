//! Gate decision logic.
//!
//! One decision per invocation: allow silently, allow with a confidence
//! annotation, or block. The gate is stateless across turns; everything
//! it needs is reconstructed from the turn's own text, including the
//! idempotence check. Any message the gate appends starts with
//! [`ANNOTATION_MARKER`], and [`bears_marker`] is the single shared
//! predicate that detects an already-processed turn, so the three
//! trigger points can fire on the same logical turn without the gate
//! annotating or blocking it twice.

use serde::Serialize;
use tracing::debug;

use crate::config::ResolvedConfig;
use crate::risk::{self, RiskTier};
use crate::scorer::{self, ScoreBreakdown};
use crate::signals;
use crate::transcript::Turn;

/// Fixed prefix of every annotation the gate emits. The loop-guard: its
/// presence in turn text means the turn was already processed. Distinct
/// from the assistant's own plain "Confidence: N%" statement, which the
/// gate must still react to.
pub const ANNOTATION_MARKER: &str = "🎯 Confidence:";

/// The one shared loop-guard predicate
pub fn bears_marker(text: &str) -> bool {
    text.contains(ANNOTATION_MARKER)
}

/// What the gate decided to do with the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GateAction {
    /// Proceed, nothing to add
    Allow,
    /// Proceed, with a confidence annotation attached
    Annotate,
    /// Halt the turn until an explicit statement is supplied
    Block,
}

/// Terminal outcome of one gate evaluation. Produced fresh every
/// invocation; never stored.
#[derive(Debug, Clone)]
pub struct GateDecision {
    pub action: GateAction,
    /// Annotation text (annotate only)
    pub message: Option<String>,
    /// Block explanation fed back to the assistant (block only)
    pub reason: Option<String>,
}

impl GateDecision {
    pub fn allow() -> Self {
        Self {
            action: GateAction::Allow,
            message: None,
            reason: None,
        }
    }

    pub fn annotate(message: String) -> Self {
        Self {
            action: GateAction::Annotate,
            message: Some(message),
            reason: None,
        }
    }

    pub fn block(reason: String) -> Self {
        Self {
            action: GateAction::Block,
            message: None,
            reason: Some(reason),
        }
    }

    /// Whether the host should halt the turn
    pub fn blocks(&self) -> bool {
        self.action == GateAction::Block
    }
}

/// Evaluate the most recent turn against the resolved config.
///
/// Skip (allow, no message) when there is no turn, the turn is trivial,
/// or the loop-guard marker is already present. Otherwise high-risk
/// turns must carry an explicit statement at or above the threshold;
/// the explicit statement is checked before any heuristic so a
/// restated turn annotates instead of blocking again. Everything else
/// is annotated with the score.
pub fn evaluate(turn: Option<&Turn>, config: &ResolvedConfig) -> GateDecision {
    let Some(turn) = turn else {
        debug!("no turn to evaluate, allowing");
        return GateDecision::allow();
    };

    let signal_set = signals::extract(&turn.text, &turn.actions);
    if signal_set.trivial {
        debug!("trivial turn, allowing without annotation");
        return GateDecision::allow();
    }
    if bears_marker(&turn.text) {
        debug!("loop-guard marker present, turn already processed");
        return GateDecision::allow();
    }

    let tier = risk::classify(&turn.actions);
    let breakdown = scorer::score(&signal_set);

    // Explicit statement first: a high-risk turn that was blocked and
    // then restated with enough confidence must annotate, not re-block.
    if tier == RiskTier::High {
        match signal_set.explicit_confidence {
            Some(stated) if stated >= config.min_confidence => {
                debug!(stated, tier = %tier, "explicit statement meets threshold");
            }
            Some(stated) => {
                debug!(stated, threshold = config.min_confidence, "stated confidence below threshold");
                return GateDecision::block(block_reason(Some(stated), config.min_confidence));
            }
            None => {
                debug!(tier = %tier, "high risk without explicit statement");
                return GateDecision::block(block_reason(None, config.min_confidence));
            }
        }
    }

    GateDecision::annotate(annotation_message(&breakdown, tier, config.verbose))
}

/// Annotation appended to an allowed turn. Always starts with the
/// loop-guard marker; verbose mode adds the per-rule breakdown.
fn annotation_message(breakdown: &ScoreBreakdown, tier: RiskTier, verbose: bool) -> String {
    let mut message = format!("{ANNOTATION_MARKER} {}% 🎯", breakdown.score);
    if verbose && !breakdown.reasons.is_empty() {
        message.push_str("\nBased on:");
        for reason in &breakdown.reasons {
            message.push_str("\n • ");
            message.push_str(reason);
        }
    }
    if tier != RiskTier::Low {
        message.push_str(&format!("\n(Risk: {tier})"));
    }
    message
}

/// Block message instructing the assistant how to proceed
fn block_reason(stated: Option<u8>, threshold: u8) -> String {
    let detail = match stated {
        Some(stated) => format!(
            "The stated confidence of {stated}% is below the {threshold}% threshold."
        ),
        None => format!(
            "This high-risk change requires an explicit confidence statement \
             (threshold {threshold}%)."
        ),
    };
    format!(
        "🎯 CONFIDENCE REQUIRED\n\nThis operation involves high-risk changes \
         (deletions, overwrites, or system commands). {detail}\n\n\
         Restate your response with an explicit statement:\n\
         Confidence: N% - [your reasoning]"
    )
}
