//! Argument resolution
//!
//! Turns the raw `run` options into a validated [`ProvisioningRequest`],
//! filling in the default domain and PHP version from settings. No I/O.

use crate::config::Settings;
use crate::domain::{ProvisioningRequest, host_label};
use crate::error::{DevsiteError, Result};

/// Options as they arrive from the command line
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub php: Option<String>,
}

/// Trimmed, non-empty value or `None`
fn given(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build the request for one run
pub fn resolve(options: &RawOptions, settings: &Settings) -> Result<ProvisioningRequest> {
    let Some(name) = given(options.name.as_deref()) else {
        return Err(DevsiteError::InvalidArgument {
            message: "--name is required".to_string(),
        });
    };

    let domain = match given(options.domain.as_deref()) {
        Some(domain) => domain.to_string(),
        None => format!("{}.{}", host_label(name), settings.domain_suffix),
    };
    let php = given(options.php.as_deref()).unwrap_or(&settings.default_php);

    ProvisioningRequest::new(name, domain, php)
}
