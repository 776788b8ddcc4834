//! Deterministic confidence scoring.
//!
//! Combines the signal set into a 0-100 estimate via additive,
//! order-independent rules. An explicit statement from the assistant
//! always wins over the heuristic. The heuristic result is clamped to
//! [10, 95]: the estimator is never fully certain either way.

use crate::signals::SignalSet;

/// Heuristic scores never go below this
pub const SCORE_FLOOR: u8 = 10;

/// Heuristic scores never go above this
pub const SCORE_CEILING: u8 = 95;

/// Neutral starting point before any signal adjustments
const BASE_SCORE: i32 = 50;

/// A score plus the per-rule reasoning behind it. The reasons feed the
/// verbose annotation the gate appends.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub score: u8,
    /// Statement parsed from the turn text, if any
    pub explicit: bool,
    pub reasons: Vec<String>,
}

/// Score a non-trivial signal set.
///
/// Rule order is fixed and each rule is independently additive, so the
/// output is reproducible signal-for-signal:
/// 1. explicit statement returned verbatim;
/// 2. base 50;
/// 3. +20 for actions performed;
/// 4. +10 for success language;
/// 5. +10 when uncertainty/problem language appears alongside success
///    language; uncertainty alone costs 20;
/// 6. -10 under 100 chars, +10 over 1000 chars;
/// 7. clamp to [10, 95].
pub fn score(signals: &SignalSet) -> ScoreBreakdown {
    if let Some(explicit) = signals.explicit_confidence {
        return ScoreBreakdown {
            score: explicit,
            explicit: true,
            reasons: vec!["explicit confidence statement".to_string()],
        };
    }

    let mut score = BASE_SCORE;
    let mut reasons = Vec::new();

    if signals.has_actions {
        score += 20;
        reasons.push(format!(
            "{} action(s) performed, concrete steps taken (+20)",
            signals.action_count
        ));
    }

    if signals.success_hits > 0 {
        score += 10;
        reasons.push("success language present (+10)".to_string());
    }

    // Surfacing a problem and still reporting success reads as handled,
    // not failed. Uncertainty without success is a straight penalty.
    if signals.uncertainty_hits > 0 || signals.problem_hits > 0 {
        if signals.success_hits > 0 {
            score += 10;
            reasons.push("problems surfaced and handled (+10)".to_string());
        } else if signals.uncertainty_hits > 0 {
            score -= 20;
            reasons.push("hedging language, no success signal (-20)".to_string());
        }
    }

    if signals.char_length < 100 {
        score -= 10;
        reasons.push(format!("short response, {} chars (-10)", signals.char_length));
    } else if signals.char_length > 1000 {
        score += 10;
        reasons.push(format!(
            "detailed response, {} chars (+10)",
            signals.char_length
        ));
    }

    ScoreBreakdown {
        score: score.clamp(SCORE_FLOOR as i32, SCORE_CEILING as i32) as u8,
        explicit: false,
        reasons,
    }
}
