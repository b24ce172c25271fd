//! TLS certificate provisioning
//!
//! Prefers `mkcert`, whose local CA is trusted by the developer's browsers,
//! and falls back to a self-signed `openssl` certificate. Either way the pair
//! lands at the resolved paths with the key readable by its owner only.

use super::{Step, StepContext};
use crate::domain::StepOutcome;
use crate::error::{DevsiteError, Result};
use crate::system::CommandSpec;

/// Trusted local CA tool
pub const MKCERT: &str = "mkcert";

/// Self-signed fallback generator
pub const OPENSSL: &str = "openssl";

pub const KEY_MODE: u32 = 0o600;
pub const CERT_MODE: u32 = 0o644;

/// Which generator produced (or will produce) the certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Issuer {
    Mkcert,
    SelfSigned,
}

#[derive(Debug, Default)]
pub struct CertificateProvisioner;

impl CertificateProvisioner {
    fn issuer(ctx: &StepContext<'_>) -> Issuer {
        if ctx.host.runner().locate(MKCERT).is_some() {
            Issuer::Mkcert
        } else {
            log::info!("{MKCERT} not found, falling back to a self-signed certificate");
            Issuer::SelfSigned
        }
    }

    fn command(ctx: &StepContext<'_>, issuer: Issuer) -> CommandSpec {
        let domain = ctx.request.domain();
        let paths = ctx.paths;
        match issuer {
            Issuer::Mkcert => CommandSpec::new(MKCERT)
                .arg("-cert-file")
                .path_arg(&paths.cert_file)
                .arg("-key-file")
                .path_arg(&paths.key_file)
                .arg(domain),
            Issuer::SelfSigned => CommandSpec::new(OPENSSL)
                .args(["req", "-x509", "-nodes", "-newkey", "rsa:2048"])
                .arg("-days")
                .arg(ctx.settings.tls.validity_days.to_string())
                .arg("-keyout")
                .path_arg(&paths.key_file)
                .arg("-out")
                .path_arg(&paths.cert_file)
                .arg("-subj")
                .arg(format!("/CN={domain}"))
                .arg("-addext")
                .arg(format!("subjectAltName=DNS:{domain}")),
        }
    }
}

impl Step for CertificateProvisioner {
    fn name(&self) -> &'static str {
        "Provision certificate"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let paths = ctx.paths;
        let domain = ctx.request.domain();
        let fail = |reason: String| DevsiteError::CertificateGenerationFailed {
            domain: domain.to_string(),
            reason,
        };

        if ctx.host.exists(&paths.cert_file) && ctx.host.exists(&paths.key_file) {
            return Ok(StepOutcome::skipped("certificate and key already exist"));
        }

        if let Some(dir) = paths.cert_file.parent() {
            ctx.host
                .create_dir_all(dir)
                .map_err(|e| fail(format!("cannot create {}: {e}", dir.display())))?;
        }

        let issuer = Self::issuer(ctx);
        ctx.host.run_checked(Self::command(ctx, issuer)).map_err(fail)?;

        for (path, label) in [(&paths.cert_file, "certificate"), (&paths.key_file, "key")] {
            if !ctx.host.exists(path) {
                return Err(fail(format!("{label} {} was not created", path.display())));
            }
        }

        ctx.host
            .set_mode(&paths.key_file, KEY_MODE)
            .map_err(|e| fail(e.to_string()))?;
        ctx.host
            .set_mode(&paths.cert_file, CERT_MODE)
            .map_err(|e| fail(e.to_string()))?;

        Ok(StepOutcome::Applied)
    }
}
