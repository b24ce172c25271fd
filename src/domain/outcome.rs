//! Step outcomes

use std::fmt;

use crate::error::DevsiteError;

/// Result of one pipeline step
#[derive(Debug)]
pub enum StepOutcome {
    /// The step changed the system
    Applied,
    /// The desired state was already present
    Skipped { reason: String },
    /// The step could not complete; the run aborts here
    Failed { cause: DevsiteError },
}

impl StepOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        StepOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }

    /// Short label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            StepOutcome::Applied => "applied",
            StepOutcome::Skipped { .. } => "skipped",
            StepOutcome::Failed { .. } => "failed",
        }
    }
}

impl From<crate::error::Result<StepOutcome>> for StepOutcome {
    fn from(result: crate::error::Result<StepOutcome>) -> Self {
        result.unwrap_or_else(|cause| StepOutcome::Failed { cause })
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Applied => f.write_str("applied"),
            StepOutcome::Skipped { reason } => write!(f, "skipped ({reason})"),
            StepOutcome::Failed { cause } => write!(f, "failed: {cause}"),
        }
    }
}
