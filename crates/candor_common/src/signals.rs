//! Signal extraction from turn text and actions.
//!
//! Produces the immutable `SignalSet` the scorer consumes: an explicit
//! confidence statement if one is present, lexicon hits for uncertain /
//! successful / problem language, action counts, and length. Lexicon
//! entries count at most once each so a single repeated word cannot
//! dominate the score.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::transcript::ActionCall;

/// Hedging words that lower confidence
pub const UNCERTAINTY_WORDS: &[&str] = &[
    "might",
    "maybe",
    "possibly",
    "unclear",
    "not sure",
    "uncertain",
];

/// Completion words that raise confidence
pub const SUCCESS_WORDS: &[&str] = &["successfully", "completed", "fixed", "working"];

/// Error/problem words. Alongside success language these read as
/// "surfaced and handled", which is competence, not failure.
pub const PROBLEM_WORDS: &[&str] = &["error", "failed", "issue", "problem"];

/// Canonical explicit statement: "Confidence: N%", case-insensitive.
/// N may be up to three digits; values over 100 are discarded as noise.
static EXPLICIT_CONFIDENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)confidence:\s*(\d{1,3})%").expect("confidence pattern must compile")
});

/// Trivial responses: bare acknowledgements and punctuation-only text.
/// These carry no signal worth scoring.
static TRIVIAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(?i)(yes|no)\.?$",
        r"^(?i)(ok|okay)\.?$",
        r"^(?i)(thanks?|thank you)\.?$",
        r"^[^a-zA-Z]*$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("trivial pattern must compile"))
    .collect()
});

/// Signals derived from one turn. Immutable per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSet {
    /// Parsed "Confidence: N%" value, when present and in 0..=100
    pub explicit_confidence: Option<u8>,
    pub has_actions: bool,
    pub action_count: usize,
    /// Distinct uncertainty-lexicon entries found
    pub uncertainty_hits: usize,
    /// Distinct success-lexicon entries found
    pub success_hits: usize,
    /// Distinct problem-lexicon entries found
    pub problem_hits: usize,
    pub char_length: usize,
    /// Trivial turns are excluded from scoring entirely
    pub trivial: bool,
}

/// Parse an explicit confidence statement out of turn text.
/// Out-of-range matches (e.g. "confidence: 150%") are noise, not errors:
/// they are discarded rather than clamped.
pub fn explicit_confidence(text: &str) -> Option<u8> {
    let captures = EXPLICIT_CONFIDENCE.captures(text)?;
    let value: u32 = captures[1].parse().ok()?;
    if value > 100 {
        return None;
    }
    Some(value as u8)
}

/// Whether the text matches one of the canonical trivial patterns
pub fn is_trivial(text: &str) -> bool {
    let trimmed = text.trim();
    TRIVIAL_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(trimmed))
}

/// Count distinct lexicon entries present in lowercased text
fn lexicon_hits(lower: &str, lexicon: &[&str]) -> usize {
    lexicon.iter().filter(|word| lower.contains(*word)).count()
}

/// Derive the full signal set for a turn
pub fn extract(text: &str, actions: &[ActionCall]) -> SignalSet {
    let lower = text.to_lowercase();
    SignalSet {
        explicit_confidence: explicit_confidence(text),
        has_actions: !actions.is_empty(),
        action_count: actions.len(),
        uncertainty_hits: lexicon_hits(&lower, UNCERTAINTY_WORDS),
        success_hits: lexicon_hits(&lower, SUCCESS_WORDS),
        problem_hits: lexicon_hits(&lower, PROBLEM_WORDS),
        char_length: text.chars().count(),
        // A bare acknowledgement is only trivial when nothing was done;
        // an action-bearing turn stays eligible for risk gating even
        // with empty text
        trivial: actions.is_empty() && is_trivial(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_confidence_parsing() {
        assert_eq!(explicit_confidence("Confidence: 85% - verified"), Some(85));
        assert_eq!(explicit_confidence("confidence:  40%"), Some(40));
        assert_eq!(explicit_confidence("CONFIDENCE: 0%"), Some(0));
        assert_eq!(explicit_confidence("Confidence: 100%"), Some(100));
        assert_eq!(explicit_confidence("no statement here"), None);
    }

    #[test]
    fn test_out_of_range_confidence_discarded() {
        assert_eq!(explicit_confidence("Confidence: 150%"), None);
        assert_eq!(explicit_confidence("confidence: 999%"), None);
    }

    #[test]
    fn test_trivial_detection() {
        assert!(is_trivial("ok"));
        assert!(is_trivial("Yes."));
        assert!(is_trivial("thanks"));
        assert!(is_trivial("  Thank you  "));
        assert!(is_trivial("..."));
        assert!(is_trivial("123!?"));
        assert!(!is_trivial("ok, I fixed the bug"));
        assert!(!is_trivial("Explained how recursion works."));
    }

    #[test]
    fn test_lexicon_counts_each_word_once() {
        let text = "might might might maybe";
        let set = extract(text, &[]);
        // Two distinct entries, repetition ignored
        assert_eq!(set.uncertainty_hits, 2);
    }

    #[test]
    fn test_action_signals() {
        let actions = vec![
            ActionCall::new("Read", json!({"file_path": "/tmp/a"})),
            ActionCall::new("Edit", json!({"file_path": "/tmp/a"})),
        ];
        let set = extract("Updated the file successfully.", &actions);
        assert!(set.has_actions);
        assert_eq!(set.action_count, 2);
        assert_eq!(set.success_hits, 1);
        assert!(!set.trivial);
    }

    #[test]
    fn test_action_bearing_turn_is_never_trivial() {
        let actions = vec![ActionCall::new("Delete", json!({"path": "x"}))];
        assert!(extract("ok", &actions).has_actions);
        assert!(!extract("ok", &actions).trivial);
        assert!(!extract("", &actions).trivial);
    }

    #[test]
    fn test_char_length_counts_chars() {
        let set = extract("日本語テキスト", &[]);
        assert_eq!(set.char_length, 7);
    }
}
