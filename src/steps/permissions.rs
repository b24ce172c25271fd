//! Writable-directory ownership for the web server user

use super::{Step, StepContext};
use crate::domain::StepOutcome;
use crate::error::{DevsiteError, Result};
use crate::system::CommandSpec;

/// Directories the framework writes to at runtime, relative to the project
pub const WRITABLE_DIRS: [&str; 2] = ["storage", "bootstrap/cache"];

#[derive(Debug, Default)]
pub struct PermissionFixer;

impl Step for PermissionFixer {
    fn name(&self) -> &'static str {
        "Fix permissions"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let owner = format!("{}:{}", ctx.settings.web_user, ctx.settings.web_group);
        let targets: Vec<_> = WRITABLE_DIRS
            .iter()
            .map(|rel| ctx.paths.project_dir.join(rel))
            .filter(|dir| {
                let present = dir.is_dir();
                if !present {
                    log::warn!("{} does not exist, leaving it alone", dir.display());
                }
                present
            })
            .collect();

        if targets.is_empty() {
            return Ok(StepOutcome::skipped("no writable directories in project"));
        }

        for dir in &targets {
            let fail = |reason: String| DevsiteError::PermissionFixFailed {
                path: dir.display().to_string(),
                reason,
            };
            ctx.host
                .run_checked(CommandSpec::new("chown").args(["-R", owner.as_str()]).path_arg(dir))
                .map_err(fail)?;
            ctx.host
                .run_checked(CommandSpec::new("chmod").args(["-R", "ug+rwX"]).path_arg(dir))
                .map_err(fail)?;
        }

        Ok(StepOutcome::Applied)
    }
}
