//! Filesystem locations derived from a request
//!
//! Recomputed for every run from the request and settings; nothing here is
//! persisted between invocations.

use std::path::PathBuf;

use crate::config::Settings;
use crate::domain::ProvisioningRequest;

/// Environment document name inside the project
pub const ENV_FILE: &str = ".env";

/// Template the environment document is seeded from
pub const ENV_TEMPLATE: &str = ".env.example";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub project_dir: PathBuf,
    pub public_dir: PathBuf,
    pub env_file: PathBuf,
    pub env_template: PathBuf,
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    /// Site definition in the "available" directory
    pub vhost_file: PathBuf,
    /// Symlink in the "enabled" directory
    pub vhost_link: PathBuf,
    pub php_socket: PathBuf,
    pub hosts_file: PathBuf,
}

impl ResolvedPaths {
    pub fn derive(request: &ProvisioningRequest, settings: &Settings) -> Self {
        let project_dir = settings.base_dir.join(request.project_name());
        let domain = request.domain();

        Self {
            public_dir: project_dir.join("public"),
            env_file: project_dir.join(ENV_FILE),
            env_template: project_dir.join(ENV_TEMPLATE),
            cert_file: settings.tls.cert_dir.join(format!("{domain}.crt")),
            key_file: settings.tls.cert_dir.join(format!("{domain}.key")),
            vhost_file: settings.nginx.sites_available.join(domain),
            vhost_link: settings.nginx.sites_enabled.join(domain),
            php_socket: settings.php_socket(request.php_version()),
            hosts_file: settings.hosts.file.clone(),
            project_dir,
        }
    }
}
