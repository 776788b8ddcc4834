//! End-to-end acceptance scenarios for the gating pipeline: transcript
//! in, decision out, with config resolved from real files.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use candor_common::config::{ConfigResolver, ResolvedConfig};
use candor_common::gate::{self, GateAction, ANNOTATION_MARKER};
use candor_common::scorer;
use candor_common::signals;
use candor_common::transcript;

fn write_transcript(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("session.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    path
}

fn assistant_line(content: &str) -> String {
    format!(r#"{{"type":"assistant","message":{{"role":"assistant","content":{content}}}}}"#)
}

fn config(min_confidence: u8) -> ResolvedConfig {
    ResolvedConfig {
        min_confidence,
        verbose: true,
    }
}

#[test]
fn delete_with_low_statement_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_transcript(
        dir.path(),
        &[&assistant_line(
            r#"[{"type":"text","text":"I deleted the old config file. Confidence: 40% - risky change"},{"type":"tool_use","name":"Delete","input":{"path":"config.old"}}]"#,
        )],
    );

    let turn = transcript::last_assistant_turn(&path).unwrap();
    let decision = gate::evaluate(Some(&turn), &config(50));
    assert_eq!(decision.action, GateAction::Block);
}

#[test]
fn delete_with_sufficient_statement_annotates() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_transcript(
        dir.path(),
        &[&assistant_line(
            r#"[{"type":"text","text":"I deleted the old config file. Confidence: 65% - risky change"},{"type":"tool_use","name":"Delete","input":{"path":"config.old"}}]"#,
        )],
    );

    let turn = transcript::last_assistant_turn(&path).unwrap();
    let decision = gate::evaluate(Some(&turn), &config(50));
    assert_eq!(decision.action, GateAction::Annotate);
    assert!(decision.message.unwrap().contains("65%"));
}

#[test]
fn prose_only_turn_scores_forty_and_annotates() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_transcript(
        dir.path(),
        &[&assistant_line(r#""Explained how recursion works.""#)],
    );

    let turn = transcript::last_assistant_turn(&path).unwrap();
    let set = signals::extract(&turn.text, &turn.actions);
    assert_eq!(scorer::score(&set).score, 40);

    let decision = gate::evaluate(Some(&turn), &config(50));
    assert_eq!(decision.action, GateAction::Annotate);
}

#[test]
fn trivial_turn_allows_silently() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_transcript(dir.path(), &[&assistant_line(r#""ok""#)]);

    let turn = transcript::last_assistant_turn(&path).unwrap();
    let decision = gate::evaluate(Some(&turn), &config(50));
    assert_eq!(decision.action, GateAction::Allow);
    assert!(decision.message.is_none());
}

#[test]
fn annotation_survives_every_trigger_without_duplicating() {
    // The same logical turn is evaluated at all three trigger points:
    // only the first evaluation annotates, the marker silences the rest.
    let cfg = config(50);
    let original = "Refactored the queue handling carefully and verified it.";

    let first = gate::evaluate(
        Some(&transcript::Turn {
            text: original.to_string(),
            actions: vec![],
            ordinal: 0,
        }),
        &cfg,
    );
    assert_eq!(first.action, GateAction::Annotate);
    let annotation = first.message.unwrap();
    assert!(annotation.starts_with(ANNOTATION_MARKER));

    let annotated_text = format!("{original}\n\n{annotation}");
    for _ in 0..3 {
        let repeat = gate::evaluate(
            Some(&transcript::Turn {
                text: annotated_text.clone(),
                actions: vec![],
                ordinal: 0,
            }),
            &cfg,
        );
        assert_eq!(repeat.action, GateAction::Allow);
        assert!(repeat.message.is_none());
    }
}

#[test]
fn explicit_statement_overrides_all_other_signals() {
    for n in [0u8, 10, 50, 95, 100] {
        let text = format!("might maybe possibly unclear. Confidence: {n}% - stated");
        let set = signals::extract(&text, &[]);
        assert_eq!(scorer::score(&set).score, n);
    }
}

#[test]
fn out_of_range_statement_falls_back_to_heuristic() {
    let set = signals::extract("Everything is working. Confidence: 150%", &[]);
    assert_eq!(set.explicit_confidence, None);
    let breakdown = scorer::score(&set);
    assert!(!breakdown.explicit);
    assert!(breakdown.score >= 10 && breakdown.score <= 95);
}

#[test]
fn config_precedence_through_resolver_files() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("local.json");
    let global = dir.path().join("global.json");
    std::fs::write(&local, r#"{"minConfidence": 80}"#).unwrap();
    std::fs::write(&global, r#"{"minConfidence": 50, "verbose": true}"#).unwrap();

    let resolver = ConfigResolver::new(local, Some(global), Duration::from_secs(30));
    let resolved = resolver.resolve();
    assert_eq!(resolved.min_confidence, 80);
    assert!(resolved.verbose);
}

#[test]
fn malformed_tail_still_finds_last_good_turn() {
    let dir = tempfile::tempdir().unwrap();
    let good = assistant_line(r#""Completed the migration successfully.""#);
    let path = write_transcript(
        dir.path(),
        &[&good, r#"{"type":"assistant","#, "garbage tail"],
    );

    let turn = transcript::last_assistant_turn(&path).unwrap();
    assert_eq!(turn.text, "Completed the migration successfully.");
}
