//! Dependency validation
//!
//! Probes for every collaborator before the first mutation and settles how
//! privileged writes will be made. Stops at the first missing piece.

use crate::config::{Elevation, Settings};
use crate::domain::ResolvedPaths;
use crate::error::{DevsiteError, Result};
use crate::steps::{database::MYSQL, environment::PHP, scaffold::COMPOSER, vhost::NGINX};
use crate::system::{CommandRunner, CommandSpec, Privilege};

/// Executables the pipeline calls, in check order
pub const REQUIRED_TOOLS: [&str; 4] = [NGINX, COMPOSER, MYSQL, PHP];

/// Precondition check run before any step
pub trait Preflight {
    /// Confirm every collaborator is present and return the privilege to use
    fn check(&self, paths: &ResolvedPaths) -> Result<Privilege>;
}

pub struct DependencyValidator<'a> {
    runner: &'a dyn CommandRunner,
    settings: &'a Settings,
}

impl<'a> DependencyValidator<'a> {
    pub fn new(runner: &'a dyn CommandRunner, settings: &'a Settings) -> Self {
        Self { runner, settings }
    }

    fn is_root(&self) -> bool {
        self.runner
            .run(&CommandSpec::new("id").arg("-u"))
            .is_ok_and(|output| output.succeeded() && output.stdout.trim() == "0")
    }

    fn has_passwordless_sudo(&self) -> bool {
        self.runner
            .run(&CommandSpec::new("true").elevated())
            .is_ok_and(|output| output.succeeded())
    }

    fn privilege(&self) -> Result<Privilege> {
        match self.settings.elevation {
            Elevation::None => Ok(Privilege::Direct),
            Elevation::Auto if self.is_root() => Ok(Privilege::Direct),
            Elevation::Auto | Elevation::Sudo => {
                if self.has_passwordless_sudo() {
                    Ok(Privilege::Sudo)
                } else {
                    Err(DevsiteError::PrivilegeUnavailable)
                }
            }
        }
    }
}

impl Preflight for DependencyValidator<'_> {
    fn check(&self, paths: &ResolvedPaths) -> Result<Privilege> {
        for tool in REQUIRED_TOOLS {
            match self.runner.locate(tool) {
                Some(found) => log::debug!("found {tool} at {}", found.display()),
                None => {
                    return Err(DevsiteError::MissingDependency {
                        tool: tool.to_string(),
                    });
                }
            }
        }

        if !paths.php_socket.exists() {
            return Err(DevsiteError::MissingDependency {
                tool: format!("PHP-FPM socket {}", paths.php_socket.display()),
            });
        }

        let privilege = self.privilege()?;
        log::debug!("mutations will run with {privilege:?} privilege");
        Ok(privilege)
    }
}
