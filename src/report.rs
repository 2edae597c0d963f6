//! Cleanup run reporting.
//!
//! Every orchestrator step records what happened as data instead of logging
//! side effects, so callers and tests can assert on outcomes deterministically.

use serde::Serialize;

use crate::cleanup::RepoState;

/// What a single cleanup step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The step ran and mutated its target.
    Applied,
    /// The step had nothing to do (pattern absent, file already gone).
    Skipped(String),
    /// The step failed; cleanup continued. Best-effort by contract.
    Failed(String),
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// One named step of a cleanup run.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: &'static str,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Full result of one orchestrator invocation.
#[derive(Debug, Serialize)]
pub struct CleanupReport {
    /// Repository state computed once before any mutation.
    pub state: RepoState,
    /// Steps in execution order. Empty when a guard suppressed the run.
    pub steps: Vec<StepReport>,
}

impl CleanupReport {
    pub fn guarded(state: RepoState) -> Self {
        Self {
            state,
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, step: &'static str, outcome: StepOutcome) {
        self.steps.push(StepReport { step, outcome });
    }

    pub fn outcome_of(&self, step: &str) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == step).map(|s| &s.outcome)
    }

    /// True when every executed step applied or skipped cleanly.
    pub fn fully_applied(&self) -> bool {
        !self.steps.iter().any(|s| s.outcome.is_failure())
    }
}
