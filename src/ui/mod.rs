//! UI/Progress presentation layer
//!
//! This module handles:
//! - Progress reporting while the pipeline runs
//! - The final run report (text or JSON)
//!
//! All progress reporting goes through the ProgressReporter trait, so the
//! pipeline does not know whether a spinner is drawn (`--quiet` and JSON
//! output use the silent reporter).

pub mod display;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::StepOutcome;

pub use display::ResultReporter;

/// Progress reporter trait for the provisioning pipeline
pub trait ProgressReporter: Send + Sync {
    /// A step is about to run
    fn step_started(&mut self, name: &str);

    /// A step has produced its outcome
    fn step_finished(&mut self, name: &str, outcome: &StepOutcome);

    /// Every step completed
    fn finish(&mut self);

    /// Abandon on error
    fn abandon(&mut self);
}

/// Interactive progress reporter with a bar and the current step name
pub struct InteractiveProgressReporter {
    pb: ProgressBar,
}

impl InteractiveProgressReporter {
    /// Create a new interactive progress reporter with total step count
    pub fn new(total_steps: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::new(total_steps);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(120));
        Self { pb }
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn step_started(&mut self, name: &str) {
        self.pb.set_message(name.to_string());
    }

    fn step_finished(&mut self, _name: &str, outcome: &StepOutcome) {
        if !outcome.is_failed() {
            self.pb.inc(1);
        }
    }

    fn finish(&mut self) {
        self.pb.finish_and_clear();
    }

    fn abandon(&mut self) {
        self.pb.abandon();
    }
}

/// Silent progress reporter
///
/// No-op implementation used with `--quiet`, JSON output and in tests.
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn step_started(&mut self, _name: &str) {
        // No-op for silent mode
    }

    fn step_finished(&mut self, _name: &str, _outcome: &StepOutcome) {
        // No-op for silent mode
    }

    fn finish(&mut self) {
        // No-op for silent mode
    }

    fn abandon(&mut self) {
        // No-op for silent mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_progress_reporter_no_ops() {
        let mut reporter = SilentProgressReporter;

        // All methods should do nothing and not panic
        reporter.step_started("Scaffold project");
        reporter.step_finished("Scaffold project", &StepOutcome::Applied);
        reporter.finish();
        reporter.abandon();
    }

    #[test]
    fn test_interactive_progress_reporter_counts_completed_steps() {
        let mut reporter = InteractiveProgressReporter::new(9);
        reporter.step_started("Check dependencies");
        reporter.step_finished("Check dependencies", &StepOutcome::Applied);
        reporter.step_finished("Scaffold project", &StepOutcome::skipped("exists"));
        assert_eq!(reporter.pb.position(), 2);
        reporter.finish();
    }

    #[test]
    fn test_interactive_progress_reporter_failed_step_not_counted() {
        let mut reporter = InteractiveProgressReporter::new(9);
        reporter.step_finished(
            "Reload nginx",
            &StepOutcome::Failed {
                cause: crate::error::DevsiteError::PrivilegeUnavailable,
            },
        );
        assert_eq!(reporter.pb.position(), 0);
        reporter.abandon();
    }
}
