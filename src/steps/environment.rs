//! Environment document configuration
//!
//! Ensures `.env` exists (seeded from `.env.example`) and holds the values
//! derived from the request. Absent keys are appended; a commented-out
//! assignment is activated in place. Running the step again on its own output
//! changes nothing.

use super::env_document::EnvDocument;
use super::{Step, StepContext};
use crate::domain::StepOutcome;
use crate::error::{DevsiteError, Result};
use crate::system::CommandSpec;

/// PHP CLI used to run artisan
pub const PHP: &str = "php";

/// Key holding the application encryption key
pub const APP_KEY: &str = "APP_KEY";

#[derive(Debug, Default)]
pub struct EnvironmentConfigurator;

/// Every key the step owns, with its value for this run
pub fn desired_entries(ctx: &StepContext<'_>) -> Vec<(&'static str, String)> {
    let db = &ctx.settings.database;
    vec![
        ("APP_NAME", ctx.request.project_name().to_string()),
        ("APP_ENV", "local".to_string()),
        ("APP_URL", ctx.request.app_url()),
        ("SESSION_DRIVER", "file".to_string()),
        ("CACHE_STORE", "file".to_string()),
        ("QUEUE_CONNECTION", "sync".to_string()),
        ("DB_CONNECTION", "mysql".to_string()),
        ("DB_HOST", db.host.clone()),
        ("DB_PORT", db.port.to_string()),
        ("DB_DATABASE", ctx.request.database().to_string()),
        ("DB_USERNAME", db.username.clone()),
        ("DB_PASSWORD", db.password.clone()),
    ]
}

impl EnvironmentConfigurator {
    fn load(ctx: &StepContext<'_>) -> Result<(EnvDocument, bool)> {
        let paths = ctx.paths;
        let (source, seeded) = if ctx.host.exists(&paths.env_file) {
            (&paths.env_file, false)
        } else if ctx.host.exists(&paths.env_template) {
            log::info!("seeding {} from template", paths.env_file.display());
            (&paths.env_template, true)
        } else {
            log::warn!(
                "no {} template, starting from an empty document",
                paths.env_template.display()
            );
            return Ok((EnvDocument::default(), true));
        };

        let content = ctx
            .host
            .read_to_string(source)
            .map_err(|e| DevsiteError::EnvConfigFailed {
                path: source.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok((EnvDocument::parse(&content), seeded))
    }

    fn generate_key(ctx: &StepContext<'_>) -> Result<()> {
        let spec = CommandSpec::new(PHP)
            .args(["artisan", "key:generate", "--force", "--no-interaction"])
            .current_dir(&ctx.paths.project_dir);
        ctx.host
            .run_checked(spec)
            .map(|_| ())
            .map_err(|reason| DevsiteError::EnvConfigFailed {
                path: ctx.paths.env_file.display().to_string(),
                reason,
            })
    }
}

impl Step for EnvironmentConfigurator {
    fn name(&self) -> &'static str {
        "Configure environment"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let (mut doc, mut changed) = Self::load(ctx)?;

        for (key, value) in desired_entries(ctx) {
            changed |= doc.set(key, &value);
        }

        if changed {
            ctx.host
                .write(&ctx.paths.env_file, &doc.render())
                .map_err(|e| DevsiteError::EnvConfigFailed {
                    path: ctx.paths.env_file.display().to_string(),
                    reason: e.to_string(),
                })?;
        }

        if doc.get(APP_KEY).is_none_or(str::is_empty) {
            Self::generate_key(ctx)?;
            changed = true;
        }

        if changed {
            Ok(StepOutcome::Applied)
        } else {
            Ok(StepOutcome::skipped("environment already configured"))
        }
    }
}
