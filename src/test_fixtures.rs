//! Test fixtures for step and pipeline tests.
//!
//! Builds a scratch machine layout inside a temp directory: a base directory
//! for projects, nginx available/enabled directories, a certificate directory,
//! a hosts file and a PHP-FPM socket placeholder. Settings point every system
//! path there and disable elevation.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::Sandbox;
//!
//! #[test]
//! fn my_test() {
//!     let sandbox = Sandbox::new("blog-app");
//!     let runner = FakeRunner::new();
//!     let host = sandbox.host(&runner);
//!     let ctx = sandbox.context(&host);
//! }
//! ```

#![allow(clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::{Elevation, Settings};
use crate::domain::{ProvisioningRequest, ResolvedPaths};
use crate::steps::StepContext;
use crate::system::{CommandRunner, HostFs, Privilege};

#[path = "../tests/common/snapshot.rs"]
mod snapshot;
pub use snapshot::snapshot;

/// Scratch machine layout for one project
pub struct Sandbox {
    pub temp: TempDir,
    pub settings: Settings,
    pub request: ProvisioningRequest,
    pub paths: ResolvedPaths,
}

impl Sandbox {
    /// Sandbox for `name` with the default domain and PHP version
    pub fn new(name: &str) -> Self {
        Self::with_request(
            ProvisioningRequest::new(name, format!("{name}.local"), "8.3")
                .expect("valid test request"),
        )
    }

    pub fn with_request(request: ProvisioningRequest) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let settings = sandbox_settings(temp.path());

        for dir in [
            &settings.base_dir,
            &settings.nginx.sites_available,
            &settings.nginx.sites_enabled,
            &settings.tls.cert_dir,
        ] {
            fs::create_dir_all(dir).expect("Failed to create sandbox directory");
        }
        fs::write(&settings.hosts.file, "127.0.0.1 localhost\n::1 localhost\n")
            .expect("Failed to write hosts file");

        let paths = ResolvedPaths::derive(&request, &settings);
        if let Some(parent) = paths.php_socket.parent() {
            fs::create_dir_all(parent).expect("Failed to create socket directory");
        }
        fs::write(&paths.php_socket, "").expect("Failed to create socket placeholder");

        Self {
            temp,
            settings,
            request,
            paths,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn host<'a>(&self, runner: &'a dyn CommandRunner) -> HostFs<'a> {
        HostFs::new(runner, Privilege::Direct)
    }

    pub fn context<'a>(&'a self, host: &'a HostFs<'a>) -> StepContext<'a> {
        StepContext {
            request: &self.request,
            paths: &self.paths,
            settings: &self.settings,
            host,
        }
    }

    /// Lay out a project the way `composer create-project` would
    pub fn scaffold_project(&self) {
        write_project_skeleton(&self.paths.project_dir);
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).expect("Failed to read sandbox file")
    }
}

/// Settings rooted at `root` with elevation disabled
pub fn sandbox_settings(root: &Path) -> Settings {
    let mut settings = Settings {
        base_dir: root.join("www"),
        elevation: Elevation::None,
        ..Settings::default()
    };
    settings.nginx.sites_available = root.join("nginx/sites-available");
    settings.nginx.sites_enabled = root.join("nginx/sites-enabled");
    settings.tls.cert_dir = root.join("ssl");
    settings.hosts.file = root.join("hosts");
    settings.php.socket_template = root
        .join("run/php{version}-fpm.sock")
        .display()
        .to_string();
    settings
}

/// Minimal Laravel-like skeleton
pub fn write_project_skeleton(dir: &Path) {
    for sub in ["public", "storage", "bootstrap/cache"] {
        fs::create_dir_all(dir.join(sub)).expect("Failed to create project directory");
    }
    fs::write(dir.join("composer.json"), "{}\n").expect("Failed to write composer.json");
    fs::write(dir.join("artisan"), "#!/usr/bin/env php\n").expect("Failed to write artisan");
    fs::write(dir.join(".env.example"), ENV_EXAMPLE).expect("Failed to write .env.example");
}

/// Trimmed-down `.env.example` of a fresh Laravel 11 project
pub const ENV_EXAMPLE: &str = "APP_NAME=Laravel
APP_ENV=local
APP_KEY=
APP_DEBUG=true
APP_URL=http://localhost

LOG_CHANNEL=stack

DB_CONNECTION=sqlite
# DB_HOST=127.0.0.1
# DB_PORT=3306
# DB_DATABASE=laravel
# DB_USERNAME=root
# DB_PASSWORD=

SESSION_DRIVER=database
QUEUE_CONNECTION=database
CACHE_STORE=database
";

/// Last argument of a command, as a path
pub fn last_arg_path(args: &[String]) -> PathBuf {
    PathBuf::from(args.last().expect("command has arguments"))
}
