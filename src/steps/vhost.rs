//! Virtual-host publishing
//!
//! The site file is fully derived from the request, so it is rewritten on
//! every run and re-linked into the enabled set. `nginx -t` gates the reload
//! that follows: when it fails the daemon keeps serving its previous config.

use std::io;
use std::path::Path;

use super::nginx_site::SiteDefinition;
use super::{Step, StepContext};
use crate::domain::StepOutcome;
use crate::error::{DevsiteError, Result};
use crate::system::CommandSpec;

/// Reverse-proxy daemon
pub const NGINX: &str = "nginx";

#[derive(Debug, Default)]
pub struct VhostPublisher;

fn write_failed(path: &Path, e: &io::Error) -> DevsiteError {
    DevsiteError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

impl Step for VhostPublisher {
    fn name(&self) -> &'static str {
        "Publish virtual host"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let paths = ctx.paths;
        let site = SiteDefinition::for_project(ctx.request, paths).render();

        for link_or_file in [&paths.vhost_file, &paths.vhost_link] {
            if let Some(dir) = link_or_file.parent() {
                ctx.host
                    .create_dir_all(dir)
                    .map_err(|e| write_failed(dir, &e))?;
            }
        }

        ctx.host
            .write(&paths.vhost_file, &site)
            .map_err(|e| write_failed(&paths.vhost_file, &e))?;
        ctx.host
            .symlink(&paths.vhost_file, &paths.vhost_link)
            .map_err(|e| write_failed(&paths.vhost_link, &e))?;

        ctx.host
            .run_checked(CommandSpec::new(NGINX).arg("-t"))
            .map_err(|reason| DevsiteError::InvalidProxyConfig { reason })?;

        Ok(StepOutcome::Applied)
    }
}
