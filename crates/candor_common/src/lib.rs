//! Candor Common - shared core for the confidence gating pipeline.
//!
//! Evaluates the assistant's most recent turn: reads it back out of the
//! session transcript, extracts textual and behavioral signals, scores
//! confidence, classifies action risk, and produces a single gate
//! decision per hook invocation. Fails open: any internal error turns
//! into an allow decision, never a block.

pub mod config;
pub mod debuglog;
pub mod gate;
pub mod hook_io;
pub mod notes;
pub mod paths;
pub mod pipeline;
pub mod risk;
pub mod scorer;
pub mod signals;
pub mod transcript;

pub use config::{ConfigResolver, ResolvedConfig};
pub use gate::{GateAction, GateDecision};
pub use hook_io::{HookInput, HookOutput, TriggerPoint};
pub use risk::RiskTier;
pub use transcript::{ActionCall, Turn};
