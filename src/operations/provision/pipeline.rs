//! Provisioning pipeline
//!
//! An explicit state machine: one state per step, advanced on `Applied` or
//! `Skipped`, moved to `Aborted` on the first failure. Nothing done by an
//! earlier step is undone when a later one fails.

use std::fmt;

use super::preflight::Preflight;
use crate::config::Settings;
use crate::domain::{ProvisioningRequest, ResolvedPaths, StepOutcome};
use crate::error::DevsiteError;
use crate::steps::{
    CertificateProvisioner, DatabaseProvisioner, EnvironmentConfigurator, HostsFileUpdater,
    PermissionFixer, ProjectScaffolder, ServiceReloader, Step, StepContext, VhostPublisher,
};
use crate::system::{CommandRunner, HostFs};
use crate::ui::ProgressReporter;

/// Name shown for the dependency check
pub const VALIDATION_STEP: &str = "Check dependencies";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    Validating,
    Scaffolding,
    PermissionFixing,
    EnvConfiguring,
    DatabaseProvisioning,
    HostsUpdating,
    CertProvisioning,
    VhostPublishing,
    ServiceReloading,
    Done,
    Aborted,
}

impl PipelineState {
    /// States that run a step executor, in order
    pub const STEP_STATES: [PipelineState; 8] = [
        PipelineState::Scaffolding,
        PipelineState::PermissionFixing,
        PipelineState::EnvConfiguring,
        PipelineState::DatabaseProvisioning,
        PipelineState::HostsUpdating,
        PipelineState::CertProvisioning,
        PipelineState::VhostPublishing,
        PipelineState::ServiceReloading,
    ];

    /// Successor after a non-failed outcome
    pub fn next(self) -> Self {
        match self {
            Self::NotStarted => Self::Validating,
            Self::Validating => Self::Scaffolding,
            Self::Scaffolding => Self::PermissionFixing,
            Self::PermissionFixing => Self::EnvConfiguring,
            Self::EnvConfiguring => Self::DatabaseProvisioning,
            Self::DatabaseProvisioning => Self::HostsUpdating,
            Self::HostsUpdating => Self::CertProvisioning,
            Self::CertProvisioning => Self::VhostPublishing,
            Self::VhostPublishing => Self::ServiceReloading,
            Self::ServiceReloading | Self::Done => Self::Done,
            Self::Aborted => Self::Aborted,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Validating => "validating",
            Self::Scaffolding => "scaffolding",
            Self::PermissionFixing => "permission_fixing",
            Self::EnvConfiguring => "env_configuring",
            Self::DatabaseProvisioning => "database_provisioning",
            Self::HostsUpdating => "hosts_updating",
            Self::CertProvisioning => "cert_provisioning",
            Self::VhostPublishing => "vhost_publishing",
            Self::ServiceReloading => "service_reloading",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The eight executors, one per step state
pub struct StepSet {
    steps: [Box<dyn Step>; 8],
}

impl StepSet {
    /// Executors ordered like [`PipelineState::STEP_STATES`]
    pub fn new(steps: [Box<dyn Step>; 8]) -> Self {
        Self { steps }
    }

    /// The production executors
    pub fn standard(reuse_existing: bool) -> Self {
        Self::new([
            Box::new(ProjectScaffolder::new(reuse_existing)),
            Box::new(PermissionFixer),
            Box::new(EnvironmentConfigurator),
            Box::new(DatabaseProvisioner),
            Box::new(HostsFileUpdater),
            Box::new(CertificateProvisioner),
            Box::new(VhostPublisher),
            Box::new(ServiceReloader),
        ])
    }

    fn for_state(&self, state: PipelineState) -> Option<&dyn Step> {
        PipelineState::STEP_STATES
            .iter()
            .position(|s| *s == state)
            .map(|i| self.steps[i].as_ref())
    }
}

/// One executed step and how it ended
#[derive(Debug)]
pub struct StepRecord {
    pub name: &'static str,
    pub state: PipelineState,
    pub outcome: StepOutcome,
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct PipelineReport {
    pub records: Vec<StepRecord>,
    pub final_state: PipelineState,
}

impl PipelineReport {
    pub fn succeeded(&self) -> bool {
        self.final_state == PipelineState::Done
    }

    /// The failure that aborted the run
    #[cfg(test)]
    pub fn failure(&self) -> Option<&DevsiteError> {
        self.records.iter().find_map(|record| match &record.outcome {
            StepOutcome::Failed { cause } => Some(cause),
            _ => None,
        })
    }

    /// Consume the report, yielding the aborting error if any
    pub fn into_failure(self) -> Option<DevsiteError> {
        self.records
            .into_iter()
            .find_map(|record| match record.outcome {
                StepOutcome::Failed { cause } => Some(cause),
                _ => None,
            })
    }
}

pub struct ProvisioningPipeline<'a> {
    request: &'a ProvisioningRequest,
    paths: &'a ResolvedPaths,
    settings: &'a Settings,
    runner: &'a dyn CommandRunner,
    preflight: &'a dyn Preflight,
    steps: StepSet,
    progress: Option<&'a mut dyn ProgressReporter>,
    state: PipelineState,
}

impl<'a> ProvisioningPipeline<'a> {
    pub fn new(
        request: &'a ProvisioningRequest,
        paths: &'a ResolvedPaths,
        settings: &'a Settings,
        runner: &'a dyn CommandRunner,
        preflight: &'a dyn Preflight,
        steps: StepSet,
        progress: Option<&'a mut dyn ProgressReporter>,
    ) -> Self {
        Self {
            request,
            paths,
            settings,
            runner,
            preflight,
            steps,
            progress,
            state: PipelineState::NotStarted,
        }
    }

    fn transition(&mut self, to: PipelineState) {
        log::info!("pipeline: {} -> {to}", self.state);
        self.state = to;
    }

    fn started(&mut self, name: &str) {
        if let Some(progress) = self.progress.as_deref_mut() {
            progress.step_started(name);
        }
    }

    fn finished(&mut self, name: &str, outcome: &StepOutcome) {
        if let Some(progress) = self.progress.as_deref_mut() {
            progress.step_finished(name, outcome);
        }
    }

    /// Record an outcome and advance, or abort on failure
    fn settle(&mut self, records: &mut Vec<StepRecord>, name: &'static str, outcome: StepOutcome) {
        self.finished(name, &outcome);
        let failed = outcome.is_failed();
        log::info!("{name}: {outcome}");
        records.push(StepRecord {
            name,
            state: self.state,
            outcome,
        });
        let next = if failed {
            PipelineState::Aborted
        } else {
            self.state.next()
        };
        self.transition(next);
    }

    /// Drive the machine to `Done` or `Aborted`
    pub fn run(mut self) -> PipelineReport {
        let mut records = Vec::new();

        self.transition(PipelineState::Validating);
        self.started(VALIDATION_STEP);
        let privilege = match self.preflight.check(self.paths) {
            Ok(privilege) => privilege,
            Err(cause) => {
                self.settle(&mut records, VALIDATION_STEP, StepOutcome::Failed { cause });
                return self.finish(records);
            }
        };
        self.settle(&mut records, VALIDATION_STEP, StepOutcome::Applied);

        let host = HostFs::new(self.runner, privilege);
        let ctx = StepContext {
            request: self.request,
            paths: self.paths,
            settings: self.settings,
            host: &host,
        };

        while !self.state.is_terminal() {
            let Some(step) = self.steps.for_state(self.state) else {
                break;
            };
            let name = step.name();
            if let Some(progress) = self.progress.as_deref_mut() {
                progress.step_started(name);
            }
            let outcome = StepOutcome::from(step.apply(&ctx));
            self.settle(&mut records, name, outcome);
        }

        self.finish(records)
    }

    fn finish(mut self, records: Vec<StepRecord>) -> PipelineReport {
        if let Some(progress) = self.progress.as_deref_mut() {
            if self.state == PipelineState::Done {
                progress.finish();
            } else {
                progress.abandon();
            }
        }
        PipelineReport {
            records,
            final_state: self.state,
        }
    }
}
