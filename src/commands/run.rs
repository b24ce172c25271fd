//! Run command implementation
//!
//! Resolves the request, runs the pipeline with real processes, prints the
//! report and turns an aborted run into the error that caused it.

use std::path::PathBuf;

use crate::cli::{OutputFormat, RunArgs};
use crate::config::{self, Settings};
use crate::domain::ResolvedPaths;
use crate::error::Result;
use crate::operations::provision::{
    DependencyValidator, PipelineState, ProvisioningPipeline, RawOptions, StepSet, resolve,
};
use crate::system::{SystemRunner, browser};
use crate::ui::display::RunSummary;
use crate::ui::{
    InteractiveProgressReporter, ProgressReporter, ResultReporter, SilentProgressReporter,
};

/// Settings file plus command-line overrides
fn settings_for(config_path: Option<PathBuf>, args: &RunArgs) -> Result<Settings> {
    let mut settings = config::load_settings(config_path.as_deref())?;
    if let Some(base_dir) = &args.base_dir {
        settings.base_dir = base_dir.clone();
        settings.validate()?;
    }
    Ok(settings)
}

/// Run the provisioning workflow
pub fn run(config_path: Option<PathBuf>, args: RunArgs) -> Result<()> {
    let settings = settings_for(config_path, &args)?;
    let request = resolve(
        &RawOptions {
            name: args.name.clone(),
            domain: args.domain.clone(),
            php: args.php.clone(),
        },
        &settings,
    )?;
    let paths = ResolvedPaths::derive(&request, &settings);
    log::debug!("resolved {request:?} to {paths:?}");

    let runner = SystemRunner;
    let validator = DependencyValidator::new(&runner, &settings);

    let mut progress: Box<dyn ProgressReporter> =
        if args.quiet || args.format == OutputFormat::Json {
            Box::new(SilentProgressReporter)
        } else {
            // Dependency check plus one per step
            let total = PipelineState::STEP_STATES.len() as u64 + 1;
            Box::new(InteractiveProgressReporter::new(total))
        };

    let report = ProvisioningPipeline::new(
        &request,
        &paths,
        &settings,
        &runner,
        &validator,
        StepSet::standard(args.reuse_existing),
        Some(progress.as_mut()),
    )
    .run();

    let summary = RunSummary::new(&report, &request, &paths, &settings);
    println!("{}", ResultReporter::new(args.format).render(&summary)?);

    if let Some(cause) = report.into_failure() {
        return Err(cause);
    }

    if args.open {
        browser::open(&request.app_url());
    }
    Ok(())
}
