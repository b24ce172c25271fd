//! Provisioning request domain types
//!
//! A `ProvisioningRequest` is built once per invocation and never mutated.
//! Its constructor enforces every invariant the later steps rely on, so a
//! request that exists is always safe to turn into paths and identifiers.

use std::fmt;

use crate::error::{DevsiteError, Result};

/// Longest accepted project name (also the MySQL identifier limit)
pub const MAX_NAME_LEN: usize = 64;

/// Longest DNS label
pub const MAX_LABEL_LEN: usize = 63;

/// What to provision: one project, one domain, one PHP version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    project_name: String,
    domain: String,
    php_version: String,
}

impl ProvisioningRequest {
    /// Build a validated request
    pub fn new(
        project_name: impl Into<String>,
        domain: impl Into<String>,
        php_version: impl Into<String>,
    ) -> Result<Self> {
        let project_name = project_name.into();
        let domain = domain.into();
        let php_version = php_version.into();

        validate_project_name(&project_name)?;
        validate_domain(&domain)?;
        validate_php_version(&php_version)?;

        Ok(Self {
            project_name,
            domain,
            php_version,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn php_version(&self) -> &str {
        &self.php_version
    }

    /// Public URL of the site; always HTTPS
    pub fn app_url(&self) -> String {
        format!("https://{}", self.domain)
    }

    pub fn database(&self) -> DatabaseIdentifier {
        DatabaseIdentifier::from_project_name(&self.project_name)
    }
}

/// Database name derived from the project name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseIdentifier(String);

impl DatabaseIdentifier {
    /// Replace every character MySQL would require quoting for with `_`
    pub fn from_project_name(name: &str) -> Self {
        Self(
            name.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host name label derived from a project name
///
/// `_` becomes `-`, edge hyphens are dropped and the result is cut to one DNS
/// label. Names start with a letter or digit, so the label is never empty.
pub fn host_label(name: &str) -> String {
    let mapped: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .take(MAX_LABEL_LEN)
        .collect();
    mapped.trim_matches('-').to_string()
}

fn invalid(message: String) -> DevsiteError {
    DevsiteError::InvalidArgument { message }
}

fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid("--name must not be empty".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid(format!(
            "--name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    let mut chars = name.chars();
    let starts_alnum = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    if !starts_alnum {
        return Err(invalid(format!(
            "--name '{name}' must start with a letter or digit"
        )));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_')) {
        return Err(invalid(format!(
            "--name '{name}' contains '{bad}'; only letters, digits, '-' and '_' are allowed"
        )));
    }
    Ok(())
}

fn validate_domain(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(invalid("--domain must not be empty".to_string()));
    }
    for label in domain.split('.') {
        let valid = !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(invalid(format!("--domain '{domain}' is not a valid host name")));
        }
    }
    Ok(())
}

fn validate_php_version(version: &str) -> Result<()> {
    let valid = !version.is_empty()
        && version
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    if !valid {
        return Err(invalid(format!(
            "--php '{version}' is not a version number (expected e.g. 8.3)"
        )));
    }
    Ok(())
}
