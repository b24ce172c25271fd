//! Tool settings (config.yaml)
//!
//! Every system location the pipeline touches comes from here, so tests (and
//! unusual setups) can point the whole run at a scratch directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DevsiteError, Result};

/// Placeholder replaced with the PHP version in the socket template
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// How privileged mutations are carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Elevation {
    /// Root if already root, passwordless sudo otherwise
    #[default]
    Auto,
    /// Always go through `sudo -n`
    Sudo,
    /// Never escalate; all target paths must be writable by the caller
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory that holds one sub-directory per project
    pub base_dir: PathBuf,
    /// PHP version used when `--php` is not given
    pub default_php: String,
    /// Suffix appended to the project name to form the default domain
    pub domain_suffix: String,
    pub web_user: String,
    pub web_group: String,
    pub elevation: Elevation,
    pub scaffold: ScaffoldSettings,
    pub php: PhpSettings,
    pub database: DatabaseSettings,
    pub nginx: NginxSettings,
    pub tls: TlsSettings,
    pub hosts: HostsSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaffoldSettings {
    /// Composer package passed to `create-project`
    pub package: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhpSettings {
    /// FastCGI socket path, `{version}` is substituted
    pub socket_template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub charset: String,
    pub collation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NginxSettings {
    pub sites_available: PathBuf,
    pub sites_enabled: PathBuf,
    /// Program and arguments used to reload the daemon
    pub reload_command: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TlsSettings {
    pub cert_dir: PathBuf,
    /// Validity window of the self-signed fallback certificate
    pub validity_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostsSettings {
    pub file: PathBuf,
    /// Address written in front of the domain
    pub address: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("/var/www"),
            default_php: "8.3".to_string(),
            domain_suffix: "local".to_string(),
            web_user: "www-data".to_string(),
            web_group: "www-data".to_string(),
            elevation: Elevation::default(),
            scaffold: ScaffoldSettings::default(),
            php: PhpSettings::default(),
            database: DatabaseSettings::default(),
            nginx: NginxSettings::default(),
            tls: TlsSettings::default(),
            hosts: HostsSettings::default(),
        }
    }
}

impl Default for ScaffoldSettings {
    fn default() -> Self {
        Self {
            package: "laravel/laravel".to_string(),
        }
    }
}

impl Default for PhpSettings {
    fn default() -> Self {
        Self {
            socket_template: "/run/php/php{version}-fpm.sock".to_string(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            username: "root".to_string(),
            password: String::new(),
            charset: "utf8mb4".to_string(),
            collation: "utf8mb4_unicode_ci".to_string(),
        }
    }
}

impl Default for NginxSettings {
    fn default() -> Self {
        Self {
            sites_available: PathBuf::from("/etc/nginx/sites-available"),
            sites_enabled: PathBuf::from("/etc/nginx/sites-enabled"),
            reload_command: vec![
                "systemctl".to_string(),
                "reload".to_string(),
                "nginx".to_string(),
            ],
        }
    }
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            cert_dir: PathBuf::from("/etc/nginx/ssl"),
            validity_days: 365,
        }
    }
}

impl Default for HostsSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("/etc/hosts"),
            address: "127.0.0.1".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file is a valid "use the defaults" config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the pipeline cannot act on
    pub fn validate(&self) -> Result<()> {
        if self.nginx.reload_command.is_empty() {
            return Err(DevsiteError::ConfigInvalid {
                message: "nginx.reload_command must name a program".to_string(),
            });
        }
        if self.tls.validity_days == 0 {
            return Err(DevsiteError::ConfigInvalid {
                message: "tls.validity_days must be greater than zero".to_string(),
            });
        }
        if !self.php.socket_template.contains(VERSION_PLACEHOLDER) {
            return Err(DevsiteError::ConfigInvalid {
                message: format!("php.socket_template must contain '{VERSION_PLACEHOLDER}'"),
            });
        }
        if self.domain_suffix.trim().is_empty() {
            return Err(DevsiteError::ConfigInvalid {
                message: "domain_suffix must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Socket path for a PHP version
    pub fn php_socket(&self, php_version: &str) -> PathBuf {
        PathBuf::from(
            self.php
                .socket_template
                .replace(VERSION_PLACEHOLDER, php_version),
        )
    }
}
