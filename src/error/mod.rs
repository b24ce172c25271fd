//! Error types and handling for devsite
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Every error is fatal to a provisioning run: the pipeline aborts at the first
//! failing step and nothing applied before it is reverted.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for devsite operations
#[derive(Error, Diagnostic, Debug)]
pub enum DevsiteError {
    // Argument errors
    #[error("Invalid argument: {message}")]
    #[diagnostic(
        code(devsite::args::invalid),
        help("Run 'devsite run --help' for the accepted options")
    )]
    InvalidArgument { message: String },

    // Dependency errors
    #[error("Missing dependency: {tool}")]
    #[diagnostic(
        code(devsite::deps::missing),
        help("Install '{tool}' (or start the service providing it) and run again")
    )]
    MissingDependency { tool: String },

    #[error("Elevated privileges are not available")]
    #[diagnostic(
        code(devsite::deps::privilege_unavailable),
        help(
            "Run as root, configure passwordless sudo, or set 'elevation: none' if every target path is writable"
        )
    )]
    PrivilegeUnavailable,

    // Step errors
    #[error("Project directory already exists: {path}")]
    #[diagnostic(
        code(devsite::scaffold::directory_conflict),
        help(
            "Remove the directory, choose another --name, or pass --reuse-existing to provision an existing project"
        )
    )]
    DirectoryConflict { path: String },

    #[error("Failed to scaffold project: {reason}")]
    #[diagnostic(code(devsite::scaffold::failed))]
    ScaffoldFailed { reason: String },

    #[error("Failed to fix permissions on {path}: {reason}")]
    #[diagnostic(code(devsite::permissions::failed))]
    PermissionFixFailed { path: String, reason: String },

    #[error("Failed to configure environment file {path}: {reason}")]
    #[diagnostic(code(devsite::env::failed))]
    EnvConfigFailed { path: String, reason: String },

    #[error("Failed to provision database '{database}': {reason}")]
    #[diagnostic(
        code(devsite::database::failed),
        help("Check that the database server is running and the configured credentials are valid")
    )]
    DatabaseProvisioningFailed { database: String, reason: String },

    #[error("Failed to update hosts file {path}: {reason}")]
    #[diagnostic(code(devsite::hosts::failed))]
    HostsUpdateFailed { path: String, reason: String },

    #[error("Failed to generate certificate for {domain}: {reason}")]
    #[diagnostic(code(devsite::tls::generation_failed))]
    CertificateGenerationFailed { domain: String, reason: String },

    #[error("nginx rejected the site configuration: {reason}")]
    #[diagnostic(
        code(devsite::proxy::invalid_config),
        help("The running nginx configuration was not reloaded; fix the reported error and run again")
    )]
    InvalidProxyConfig { reason: String },

    #[error("Failed to reload nginx: {reason}")]
    #[diagnostic(code(devsite::proxy::reload_failed))]
    ReloadFailed { reason: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(devsite::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(devsite::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(devsite::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(devsite::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(devsite::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(devsite::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for DevsiteError {
    fn from(err: std::io::Error) -> Self {
        DevsiteError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for DevsiteError {
    fn from(err: serde_yaml::Error) -> Self {
        DevsiteError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, DevsiteError>;
