//! Escalation: ordered engine fallback
//!
//! A policy lists engines with priorities and enable flags. The runner tries
//! enabled engines in ascending priority and stops at the first match.

mod advisor;
mod policy;
mod runner;

pub use advisor::{default_engine_order, default_escalation_policy};
pub use policy::{EscalationEntry, EscalationPolicy};
pub use runner::{AttemptOutcome, EngineAttempt, EscalationReport, EscalationRunner};
