//! Local name resolution via the hosts file

use super::{Step, StepContext};
use crate::domain::StepOutcome;
use crate::error::{DevsiteError, Result};

#[derive(Debug, Default)]
pub struct HostsFileUpdater;

/// Whether any record in `content` already maps `host`
pub fn has_host(content: &str, host: &str) -> bool {
    content.lines().any(|line| {
        let record = line.split('#').next().unwrap_or_default();
        let mut fields = record.split_whitespace();
        // First field is the address
        fields.next().is_some() && fields.any(|name| name.eq_ignore_ascii_case(host))
    })
}

impl Step for HostsFileUpdater {
    fn name(&self) -> &'static str {
        "Update hosts file"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let path = &ctx.paths.hosts_file;
        let domain = ctx.request.domain();
        let fail = |reason: String| DevsiteError::HostsUpdateFailed {
            path: path.display().to_string(),
            reason,
        };

        let content = ctx
            .host
            .read_to_string(path)
            .map_err(|e| fail(e.to_string()))?;
        if has_host(&content, domain) {
            return Ok(StepOutcome::skipped(format!("{domain} already resolves")));
        }

        let separator = if content.is_empty() || content.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        let record = format!("{separator}{} {domain}\n", ctx.settings.hosts.address);
        ctx.host
            .append(path, &record)
            .map_err(|e| fail(e.to_string()))?;
        Ok(StepOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::fake::FakeRunner;
    use crate::test_fixtures::Sandbox;
    use std::fs;

    #[test]
    fn test_has_host() {
        let content = "127.0.0.1 localhost\n# 127.0.0.1 old.local\n127.0.0.1 a.local blog.local # dev\n";
        assert!(has_host(content, "blog.local"));
        assert!(has_host(content, "BLOG.local"));
        assert!(!has_host(content, "old.local"));
        assert!(!has_host(content, "blog.loc"));
        assert!(!has_host(content, "127.0.0.1"));
    }

    #[test]
    fn test_appends_record() {
        let sandbox = Sandbox::new("blog-app");
        let runner = FakeRunner::new();
        let host = sandbox.host(&runner);

        let outcome = HostsFileUpdater.apply(&sandbox.context(&host)).unwrap();
        assert!(matches!(outcome, StepOutcome::Applied));
        assert_eq!(
            sandbox.read(&sandbox.paths.hosts_file),
            "127.0.0.1 localhost\n::1 localhost\n127.0.0.1 blog-app.local\n"
        );
    }

    #[test]
    fn test_twice_never_duplicates() {
        let sandbox = Sandbox::new("blog-app");
        let runner = FakeRunner::new();
        let host = sandbox.host(&runner);
        let ctx = sandbox.context(&host);

        HostsFileUpdater.apply(&ctx).unwrap();
        let second = HostsFileUpdater.apply(&ctx).unwrap();

        assert!(matches!(second, StepOutcome::Skipped { .. }));
        let content = sandbox.read(&sandbox.paths.hosts_file);
        assert_eq!(
            content
                .lines()
                .filter(|l| l.split_whitespace().any(|f| f == "blog-app.local"))
                .count(),
            1
        );
    }

    #[test]
    fn test_missing_trailing_newline_is_repaired() {
        let sandbox = Sandbox::new("blog-app");
        fs::write(&sandbox.paths.hosts_file, "127.0.0.1 localhost").unwrap();
        let runner = FakeRunner::new();
        let host = sandbox.host(&runner);

        HostsFileUpdater.apply(&sandbox.context(&host)).unwrap();
        assert_eq!(
            sandbox.read(&sandbox.paths.hosts_file),
            "127.0.0.1 localhost\n127.0.0.1 blog-app.local\n"
        );
    }

    #[test]
    fn test_unreadable_hosts_file() {
        let sandbox = Sandbox::new("blog-app");
        fs::remove_file(&sandbox.paths.hosts_file).unwrap();
        let runner = FakeRunner::new();
        let host = sandbox.host(&runner);

        let err = HostsFileUpdater.apply(&sandbox.context(&host)).unwrap_err();
        assert!(matches!(err, DevsiteError::HostsUpdateFailed { .. }));
    }
}
