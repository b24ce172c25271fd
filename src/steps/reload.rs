//! Reverse-proxy reload

use super::{Step, StepContext};
use crate::domain::StepOutcome;
use crate::error::{DevsiteError, Result};
use crate::system::CommandSpec;

#[derive(Debug, Default)]
pub struct ServiceReloader;

impl Step for ServiceReloader {
    fn name(&self) -> &'static str {
        "Reload nginx"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let Some((program, args)) = ctx.settings.nginx.reload_command.split_first() else {
            return Err(DevsiteError::ReloadFailed {
                reason: "no reload command configured".to_string(),
            });
        };

        ctx.host
            .run_checked(CommandSpec::new(program.as_str()).args(args.iter().cloned()))
            .map_err(|reason| DevsiteError::ReloadFailed { reason })?;
        Ok(StepOutcome::Applied)
    }
}
