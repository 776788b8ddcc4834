//! Pipeline glue: one hook invocation end to end.
//!
//! Transcript Reader → Signal Extractor → Scorer (+ Risk Classifier) →
//! Gate, consulting the Configuration Resolver. The top level fails
//! open: whatever goes wrong internally, the host gets an allow
//! decision and the detail lands in the debug log.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::ConfigResolver;
use crate::debuglog::DebugLog;
use crate::gate::{self, GateAction};
use crate::hook_io::{HookInput, HookOutput, TriggerPoint, EXIT_ALLOW, EXIT_BLOCK};
use crate::transcript::{self, ActionCall, Turn};
use crate::{notes, paths};

/// Outcome of one invocation: the payload to print and the status to
/// exit with
#[derive(Debug)]
pub struct PipelineRun {
    pub output: HookOutput,
    pub exit_code: i32,
}

impl PipelineRun {
    fn allow() -> Self {
        Self {
            output: HookOutput::allow(),
            exit_code: EXIT_ALLOW,
        }
    }
}

/// Run the pipeline for one trigger point. Never fails: internal errors
/// are logged and converted to an allow decision.
pub fn run(trigger: TriggerPoint, input: &HookInput) -> PipelineRun {
    let cwd = input
        .cwd
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let dlog = DebugLog::for_cwd(&cwd, trigger.log_tag());

    match evaluate(trigger, input, &cwd, &dlog) {
        Ok(run) => run,
        Err(err) => {
            warn!(%err, trigger = %trigger, "pipeline error, failing open");
            dlog.line(&format!("internal error, failing open: {err}"));
            PipelineRun::allow()
        }
    }
}

fn evaluate(
    trigger: TriggerPoint,
    input: &HookInput,
    cwd: &Path,
    dlog: &DebugLog,
) -> anyhow::Result<PipelineRun> {
    dlog.line(&format!("=== {trigger} evaluation started ==="));

    let resolver = ConfigResolver::for_cwd(cwd);
    let config = resolver.resolve();
    dlog.line(&format!(
        "config: minConfidence={} verbose={}",
        config.min_confidence, config.verbose
    ));

    let turn = load_turn(trigger, input, dlog);
    let decision = gate::evaluate(turn.as_ref(), &config);
    dlog.line(&format!("decision: {:?}", decision.action));

    let run = match decision.action {
        GateAction::Block => PipelineRun {
            output: HookOutput::block(
                decision.reason.unwrap_or_else(|| "blocked".to_string()),
            ),
            exit_code: EXIT_BLOCK,
        },
        GateAction::Annotate => PipelineRun {
            output: HookOutput::allow_with_message(
                decision.message.unwrap_or_default(),
            ),
            exit_code: EXIT_ALLOW,
        },
        GateAction::Allow => PipelineRun::allow(),
    };

    // Before-prompt additionally surfaces recent session notes ahead of
    // the incoming user message, unless the turn was blocked.
    if trigger == TriggerPoint::BeforePrompt && run.exit_code == EXIT_ALLOW {
        if let Some(context) = notes_context() {
            dlog.line("attaching recent notes as additional context");
            return Ok(PipelineRun {
                output: run.output.with_additional_context(trigger, context),
                exit_code: run.exit_code,
            });
        }
    }

    Ok(run)
}

/// Reconstruct the most recent assistant turn. At after-action the
/// just-performed action from the hook payload is appended so risk
/// classification sees it even when the transcript record has not
/// caught up yet.
fn load_turn(trigger: TriggerPoint, input: &HookInput, dlog: &DebugLog) -> Option<Turn> {
    let mut turn = match &input.transcript_path {
        Some(path) => {
            let turn = transcript::last_assistant_turn(path);
            match &turn {
                Some(turn) => dlog.line(&format!(
                    "turn at line {}: {} chars, {} action(s)",
                    turn.ordinal,
                    turn.text.chars().count(),
                    turn.actions.len()
                )),
                None => dlog.line("no assistant turn found in transcript"),
            }
            turn
        }
        None => {
            dlog.line("no transcript path provided");
            None
        }
    };

    if trigger == TriggerPoint::AfterAction {
        if let Some(tool_name) = input.tool_name.as_deref().filter(|name| !name.is_empty()) {
            let call = ActionCall::new(
                tool_name,
                input.tool_input.clone().unwrap_or(serde_json::Value::Null),
            );
            match &mut turn {
                Some(turn) if !turn.actions.iter().any(|a| a == &call) => {
                    turn.actions.push(call)
                }
                Some(_) => {}
                // Action performed but no transcript record yet: a turn
                // made of the action alone still gets risk-classified
                None => {
                    debug!(tool_name, "synthesizing turn from hook payload");
                    turn = Some(Turn {
                        text: String::new(),
                        actions: vec![call],
                        ordinal: 0,
                    });
                }
            }
        }
    }

    turn
}

/// Recent notes rendered for additional context, if any exist
fn notes_context() -> Option<String> {
    let path = paths::notes_path()?;
    notes::recent_context(&notes::load(&path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn hook_input(transcript: &Path, cwd: &Path) -> HookInput {
        HookInput {
            transcript_path: Some(transcript.to_path_buf()),
            cwd: Some(cwd.to_path_buf()),
            ..Default::default()
        }
    }

    fn write_transcript(dir: &Path, lines: &[&str]) -> PathBuf {
        // Give the fixture dir a .claude so the debug log stays local
        let _ = std::fs::create_dir(dir.join(paths::CLAUDE_DIR));
        let path = dir.join("transcript.jsonl");
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn test_missing_transcript_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let input = hook_input(Path::new("/nonexistent.jsonl"), dir.path());
        let run = run(TriggerPoint::TurnEnd, &input);
        assert_eq!(run.exit_code, EXIT_ALLOW);
        assert_eq!(run.output.decision, "allow");
        assert!(run.output.message.is_none());
    }

    #[test]
    fn test_turn_end_annotates() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(
            dir.path(),
            &[r#"{"type":"assistant","message":{"role":"assistant","content":"Explained how recursion works."}}"#],
        );
        let input = hook_input(&transcript, dir.path());
        let run = run(TriggerPoint::TurnEnd, &input);
        assert_eq!(run.exit_code, EXIT_ALLOW);
        assert!(run.output.message.unwrap().contains("40%"));
    }

    #[test]
    fn test_after_action_payload_action_escalates() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(
            dir.path(),
            &[r#"{"type":"assistant","message":{"role":"assistant","content":"Cleaning up stale files now."}}"#],
        );
        let mut input = hook_input(&transcript, dir.path());
        input.tool_name = Some("Delete".to_string());
        input.tool_input = Some(serde_json::json!({"path": "old.txt"}));

        let run = run(TriggerPoint::AfterAction, &input);
        assert_eq!(run.exit_code, EXIT_BLOCK);
        assert_eq!(run.output.decision, "block");
        assert!(run.output.reason.is_some());
    }

    #[test]
    fn test_blocked_turn_restated_above_threshold_allows() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(
            dir.path(),
            &[r#"{"type":"assistant","message":{"role":"assistant","content":"Removed stale files. Confidence: 80% - verified the list first"}}"#],
        );
        let mut input = hook_input(&transcript, dir.path());
        input.tool_name = Some("Delete".to_string());

        let run = run(TriggerPoint::AfterAction, &input);
        assert_eq!(run.exit_code, EXIT_ALLOW);
        assert!(run.output.message.unwrap().contains("80%"));
    }

    #[test]
    fn test_debug_log_written_in_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(paths::CLAUDE_DIR)).unwrap();
        let transcript = write_transcript(
            dir.path(),
            &[r#"{"type":"assistant","message":{"role":"assistant","content":"ok"}}"#],
        );
        let input = hook_input(&transcript, dir.path());
        let run = run(TriggerPoint::TurnEnd, &input);
        assert_eq!(run.exit_code, EXIT_ALLOW);

        let log = std::fs::read_to_string(
            dir.path().join(paths::CLAUDE_DIR).join(paths::DEBUG_LOG_FILE),
        )
        .unwrap();
        assert!(log.contains("turn-end evaluation started"));
        assert!(log.contains("[STOP "));
    }
}
