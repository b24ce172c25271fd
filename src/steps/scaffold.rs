//! Project scaffolding
//!
//! The one step that is not idempotent: `composer create-project` would
//! refuse (or worse, mix files into) an existing directory, so an existing
//! target is a conflict rather than a skip.

use std::path::Path;

use super::{Step, StepContext};
use crate::domain::StepOutcome;
use crate::error::{DevsiteError, Result};
use crate::system::CommandSpec;

/// Scaffolding tool
pub const COMPOSER: &str = "composer";

/// Files whose presence marks a directory as an already scaffolded project
const PROJECT_MARKERS: [&str; 2] = ["composer.json", "artisan"];

#[derive(Debug, Default)]
pub struct ProjectScaffolder {
    /// Accept an existing, already scaffolded directory instead of failing
    pub reuse_existing: bool,
}

impl ProjectScaffolder {
    pub fn new(reuse_existing: bool) -> Self {
        Self { reuse_existing }
    }
}

fn looks_scaffolded(dir: &Path) -> bool {
    PROJECT_MARKERS.iter().all(|marker| dir.join(marker).is_file())
}

impl Step for ProjectScaffolder {
    fn name(&self) -> &'static str {
        "Scaffold project"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let dir = &ctx.paths.project_dir;

        if ctx.host.exists(dir) {
            if self.reuse_existing && looks_scaffolded(dir) {
                return Ok(StepOutcome::skipped("project already scaffolded"));
            }
            return Err(DevsiteError::DirectoryConflict {
                path: dir.display().to_string(),
            });
        }

        if let Some(parent) = dir.parent() {
            ctx.host
                .create_dir_all(parent)
                .map_err(|e| DevsiteError::ScaffoldFailed {
                    reason: format!("cannot create {}: {e}", parent.display()),
                })?;
        }

        // Scripts stay disabled so the environment document is ours to write
        let spec = CommandSpec::new(COMPOSER)
            .args(["create-project", "--no-scripts", "--no-interaction", "--prefer-dist"])
            .arg(ctx.settings.scaffold.package.as_str())
            .path_arg(dir)
            .env("COMPOSER_ALLOW_SUPERUSER", "1");
        ctx.host
            .run_checked(spec)
            .map_err(|reason| DevsiteError::ScaffoldFailed { reason })?;

        if !dir.is_dir() {
            return Err(DevsiteError::ScaffoldFailed {
                reason: format!("{COMPOSER} finished but {} was not created", dir.display()),
            });
        }

        Ok(StepOutcome::Applied)
    }
}
