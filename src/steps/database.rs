//! Database creation
//!
//! Reads the catalog first and only issues `CREATE DATABASE IF NOT EXISTS`
//! when the database is absent, so a re-run reports `Skipped`.

use super::{Step, StepContext};
use crate::config::settings::DatabaseSettings;
use crate::domain::{DatabaseIdentifier, StepOutcome};
use crate::error::{DevsiteError, Result};
use crate::system::CommandSpec;

/// Database client
pub const MYSQL: &str = "mysql";

#[derive(Debug, Default)]
pub struct DatabaseProvisioner;

/// Client invocation running one statement in batch mode
pub fn mysql_command(settings: &DatabaseSettings, statement: &str) -> CommandSpec {
    let mut spec = CommandSpec::new(MYSQL)
        .args(["--batch", "--skip-column-names"])
        .arg(format!("--host={}", settings.host))
        .arg(format!("--port={}", settings.port))
        .arg(format!("--user={}", settings.username))
        .arg("--execute")
        .arg(statement);
    // Keep the password out of the process list
    if !settings.password.is_empty() {
        spec = spec.env("MYSQL_PWD", settings.password.as_str());
    }
    spec
}

pub fn exists_statement(db: &DatabaseIdentifier) -> String {
    // `_` is a LIKE wildcard
    format!("SHOW DATABASES LIKE '{}'", db.as_str().replace('_', "\\_"))
}

pub fn create_statement(db: &DatabaseIdentifier, settings: &DatabaseSettings) -> String {
    format!(
        "CREATE DATABASE IF NOT EXISTS `{}` CHARACTER SET {} COLLATE {}",
        db.as_str(),
        settings.charset,
        settings.collation
    )
}

impl Step for DatabaseProvisioner {
    fn name(&self) -> &'static str {
        "Provision database"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let db = ctx.request.database();
        let settings = &ctx.settings.database;
        let fail = |reason: String| DevsiteError::DatabaseProvisioningFailed {
            database: db.to_string(),
            reason,
        };

        // The client talks to the server over the network; no elevation needed
        let runner = ctx.host.runner();
        let listing = runner
            .run_checked(&mysql_command(settings, &exists_statement(&db)))
            .map_err(fail)?;
        if listing.stdout.lines().any(|line| line.trim() == db.as_str()) {
            return Ok(StepOutcome::skipped(format!("database {db} already exists")));
        }

        runner
            .run_checked(&mysql_command(settings, &create_statement(&db, settings)))
            .map_err(fail)?;
        Ok(StepOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::CommandOutput;
    use crate::system::fake::FakeRunner;
    use crate::test_fixtures::Sandbox;

    fn statement(spec: &CommandSpec) -> &str {
        spec.args.last().map_or("", String::as_str)
    }

    #[test]
    fn test_creates_missing_database() {
        let sandbox = Sandbox::new("blog-app");
        let runner = FakeRunner::new();
        let host = sandbox.host(&runner);

        let outcome = DatabaseProvisioner.apply(&sandbox.context(&host)).unwrap();
        assert!(matches!(outcome, StepOutcome::Applied));

        let calls = runner.calls_to(MYSQL);
        assert_eq!(calls.len(), 2);
        assert_eq!(statement(&calls[0]), "SHOW DATABASES LIKE 'blog\\_app'");
        assert_eq!(
            statement(&calls[1]),
            "CREATE DATABASE IF NOT EXISTS `blog_app` CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci"
        );
        assert!(calls[1].args.contains(&"--host=127.0.0.1".to_string()));
        assert!(calls[1].args.contains(&"--user=root".to_string()));
    }

    #[test]
    fn test_existing_database_is_skipped() {
        let sandbox = Sandbox::new("blog-app");
        let runner = FakeRunner::new().respond(MYSQL, CommandOutput::with_stdout("blog_app\n"));
        let host = sandbox.host(&runner);

        let outcome = DatabaseProvisioner.apply(&sandbox.context(&host)).unwrap();
        assert!(matches!(outcome, StepOutcome::Skipped { .. }));
        assert_eq!(runner.calls_to(MYSQL).len(), 1);
    }

    #[test]
    fn test_password_passed_through_environment() {
        let mut sandbox = Sandbox::new("blog-app");
        sandbox.settings.database.password = "s3cret".to_string();
        let runner = FakeRunner::new();
        let host = sandbox.host(&runner);

        DatabaseProvisioner.apply(&sandbox.context(&host)).unwrap();

        for call in runner.calls_to(MYSQL) {
            assert!(call.args.iter().all(|a| !a.contains("s3cret")));
            assert_eq!(call.env, vec![("MYSQL_PWD".to_string(), "s3cret".to_string())]);
        }
    }

    #[test]
    fn test_server_error() {
        let sandbox = Sandbox::new("blog-app");
        let runner = FakeRunner::new().respond(
            MYSQL,
            CommandOutput::failure(1, "ERROR 2002 (HY000): Can't connect to local MySQL server"),
        );
        let host = sandbox.host(&runner);

        let err = DatabaseProvisioner
            .apply(&sandbox.context(&host))
            .unwrap_err();
        assert!(matches!(err, DevsiteError::DatabaseProvisioningFailed { .. }));
        assert!(err.to_string().contains("Can't connect"));
    }
}
