//! Outcome of a best-effort adapter step.
//!
//! Best-effort steps (memory search, listing, storing the assistant reply)
//! must never fail the user-visible request. Instead of swallowing the error
//! in place, they return a [`StepOutcome`] so the degraded branch is explicit
//! at the call site and always logged.

use memlens_types::error::ProxyError;
use memlens_types::vendor::Vendor;

/// Result of a step whose failure is absorbed.
#[derive(Debug)]
pub enum StepOutcome<T> {
    Completed(T),
    Degraded { step: &'static str, reason: String },
}

impl<T> StepOutcome<T> {
    /// Record the result of `step`, logging a warning when it failed.
    pub fn record(vendor: Vendor, step: &'static str, result: Result<T, ProxyError>) -> Self {
        match result {
            Ok(value) => StepOutcome::Completed(value),
            Err(err) => {
                tracing::warn!(
                    vendor = %vendor,
                    step,
                    status = ?err.status(),
                    error = %err,
                    "best-effort step failed; continuing"
                );
                StepOutcome::Degraded {
                    step,
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StepOutcome::Degraded { .. })
    }

    /// The value if the step completed.
    pub fn completed(self) -> Option<T> {
        match self {
            StepOutcome::Completed(value) => Some(value),
            StepOutcome::Degraded { .. } => None,
        }
    }
}
