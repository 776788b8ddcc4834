//! Candor Hook - gate binary invoked by the host at each trigger point.
//!
//! Reads the structured hook payload from stdin, runs the confidence
//! pipeline, prints the decision as JSON on stdout, and signals the
//! outcome through the exit status (0 allow, 2 block). The installer
//! registers one command line per trigger point, so the trigger
//! normally arrives as a subcommand; the payload's event name is the
//! fallback.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Read;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use candor_common::hook_io::{HookInput, TriggerPoint};
use candor_common::pipeline;

#[derive(Parser)]
#[command(name = "candor-hook")]
#[command(about = "Confidence gate for assistant turns", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    trigger: Option<Trigger>,
}

#[derive(Subcommand)]
enum Trigger {
    /// Evaluate before a new user message is accepted
    BeforePrompt,
    /// Evaluate after the assistant completes a tool invocation
    AfterAction,
    /// Evaluate when the assistant's turn fully ends
    TurnEnd,
}

impl Trigger {
    fn point(&self) -> TriggerPoint {
        match self {
            Trigger::BeforePrompt => TriggerPoint::BeforePrompt,
            Trigger::AfterAction => TriggerPoint::AfterAction,
            Trigger::TurnEnd => TriggerPoint::TurnEnd,
        }
    }
}

fn main() -> Result<()> {
    // Hook stderr is captured by the host's debug channel
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // An unreadable or malformed payload is no reason to hold a turn
    // hostage: treat it as empty and fail open downstream.
    let mut raw = String::new();
    let _ = std::io::stdin().read_to_string(&mut raw);
    let input = HookInput::from_json(&raw);

    let trigger = cli
        .trigger
        .map(|trigger| trigger.point())
        .or_else(|| {
            input
                .hook_event_name
                .as_deref()
                .and_then(TriggerPoint::from_event_name)
        })
        .unwrap_or(TriggerPoint::TurnEnd);
    debug!(trigger = %trigger, "hook invoked");

    let run = pipeline::run(trigger, &input);
    println!("{}", serde_json::to_string(&run.output)?);
    std::process::exit(run.exit_code);
}
