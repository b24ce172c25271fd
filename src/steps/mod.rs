//! Step executors
//!
//! One executor per side effect. Each one detects whether its desired state
//! is already present and returns `Skipped` instead of re-applying it; the
//! only exception is the scaffolder, which refuses to touch an existing
//! directory.

pub mod certificate;
pub mod database;
pub mod env_document;
pub mod environment;
pub mod hosts;
pub mod nginx_site;
pub mod permissions;
pub mod reload;
pub mod scaffold;
pub mod vhost;

use crate::config::Settings;
use crate::domain::{ProvisioningRequest, ResolvedPaths, StepOutcome};
use crate::error::Result;
use crate::system::HostFs;

pub use certificate::CertificateProvisioner;
pub use database::DatabaseProvisioner;
pub use environment::EnvironmentConfigurator;
pub use hosts::HostsFileUpdater;
pub use permissions::PermissionFixer;
pub use reload::ServiceReloader;
pub use scaffold::ProjectScaffolder;
pub use vhost::VhostPublisher;

/// Read-only view of the run shared with every step
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    pub request: &'a ProvisioningRequest,
    pub paths: &'a ResolvedPaths,
    pub settings: &'a Settings,
    pub host: &'a HostFs<'a>,
}

/// One idempotent unit of system mutation
pub trait Step {
    /// Human-readable step name used in progress output
    fn name(&self) -> &'static str;

    /// Bring the system into the step's desired state
    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome>;
}
