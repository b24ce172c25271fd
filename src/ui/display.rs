//! Run report rendering
//!
//! One line per step, then the connection details of a provisioned site.
//! The same summary serializes to JSON for `--format json`.

use std::fmt::Write as _;

use console::Style;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::domain::{ProvisioningRequest, ResolvedPaths, StepOutcome};
use crate::error::{DevsiteError, Result};
use crate::operations::provision::PipelineReport;

#[derive(Debug, Serialize)]
pub struct StepSummary {
    pub name: &'static str,
    /// Pipeline state the step ran in
    pub state: &'static str,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Where to reach the provisioned site
#[derive(Debug, Serialize)]
pub struct ConnectionDetails {
    pub url: String,
    pub project_dir: String,
    pub document_root: String,
    pub database: String,
    pub database_host: String,
    pub database_user: String,
    pub certificate: String,
    pub key: String,
    pub vhost: String,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub project: String,
    pub domain: String,
    pub php_version: String,
    pub status: &'static str,
    pub steps: Vec<StepSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionDetails>,
}

impl RunSummary {
    pub fn new(
        report: &PipelineReport,
        request: &ProvisioningRequest,
        paths: &ResolvedPaths,
        settings: &Settings,
    ) -> Self {
        let steps = report
            .records
            .iter()
            .map(|record| StepSummary {
                name: record.name,
                state: record.state.label(),
                outcome: record.outcome.label(),
                detail: match &record.outcome {
                    StepOutcome::Applied => None,
                    StepOutcome::Skipped { reason } => Some(reason.clone()),
                    StepOutcome::Failed { cause } => Some(cause.to_string()),
                },
            })
            .collect();

        let connection = report.succeeded().then(|| ConnectionDetails {
            url: request.app_url(),
            project_dir: paths.project_dir.display().to_string(),
            document_root: paths.public_dir.display().to_string(),
            database: request.database().to_string(),
            database_host: format!("{}:{}", settings.database.host, settings.database.port),
            database_user: settings.database.username.clone(),
            certificate: paths.cert_file.display().to_string(),
            key: paths.key_file.display().to_string(),
            vhost: paths.vhost_file.display().to_string(),
        });

        Self {
            project: request.project_name().to_string(),
            domain: request.domain().to_string(),
            php_version: request.php_version().to_string(),
            status: report.final_state.label(),
            steps,
            connection,
        }
    }
}

/// Renders a [`RunSummary`] in the requested format
#[derive(Debug, Clone, Copy)]
pub struct ResultReporter {
    format: OutputFormat,
}

impl ResultReporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(render_text(summary)),
            OutputFormat::Json => {
                serde_json::to_string_pretty(summary).map_err(|e| DevsiteError::IoError {
                    message: format!("cannot serialize report: {e}"),
                })
            }
        }
    }
}

fn render_text(summary: &RunSummary) -> String {
    let bold = Style::new().bold();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} ({}, PHP {})",
        bold.apply_to("Provisioning"),
        Style::new().bold().yellow().apply_to(&summary.project),
        summary.domain,
        summary.php_version
    );
    for step in &summary.steps {
        let mark = match step.outcome {
            "applied" => Style::new().green().apply_to("✓"),
            "skipped" => Style::new().dim().apply_to("-"),
            _ => Style::new().red().bold().apply_to("✗"),
        };
        match &step.detail {
            Some(detail) => {
                let _ = writeln!(
                    out,
                    "  {mark} {} {}",
                    step.name,
                    Style::new().dim().apply_to(format!("({detail})"))
                );
            }
            None => {
                let _ = writeln!(out, "  {mark} {}", step.name);
            }
        }
    }

    let Some(conn) = &summary.connection else {
        return out;
    };

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} {}",
        Style::new().bold().green().apply_to("Ready:"),
        Style::new().cyan().apply_to(&conn.url)
    );
    for (label, value) in [
        ("Project:", &conn.project_dir),
        ("Document root:", &conn.document_root),
        ("Database:", &conn.database),
        ("Database host:", &conn.database_host),
        ("Database user:", &conn.database_user),
        ("Certificate:", &conn.certificate),
        ("Key:", &conn.key),
        ("Virtual host:", &conn.vhost),
    ] {
        let _ = writeln!(out, "  {} {value}", bold.apply_to(format!("{label:<14}")));
    }
    out
}
