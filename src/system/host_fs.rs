//! Privileged filesystem access
//!
//! The hosts file, the nginx directories, the certificate directory and (with
//! the default base directory) the project tree are root-owned. `HostFs`
//! performs every mutation either directly or through `sudo -n`, depending on
//! the [`Privilege`] established before the first step runs.

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::NamedTempFile;

use super::process::{CommandRunner, CommandSpec};

/// Mode given to newly written documents
const DEFAULT_FILE_MODE: u32 = 0o644;

/// How mutations reach the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// The current process may write every target itself
    Direct,
    /// Mutations go through passwordless sudo
    Sudo,
}

pub struct HostFs<'a> {
    runner: &'a dyn CommandRunner,
    privilege: Privilege,
}

impl<'a> HostFs<'a> {
    pub fn new(runner: &'a dyn CommandRunner, privilege: Privilege) -> Self {
        Self { runner, privilege }
    }

    pub fn runner(&self) -> &'a dyn CommandRunner {
        self.runner
    }

    /// Adapt a command to the current privilege
    pub fn command(&self, spec: CommandSpec) -> CommandSpec {
        match self.privilege {
            Privilege::Direct => spec,
            Privilege::Sudo => spec.elevated(),
        }
    }

    /// Run a command with the current privilege, failing on non-zero exit
    pub fn run_checked(&self, spec: CommandSpec) -> Result<String, String> {
        let spec = self.command(spec);
        self.runner.run_checked(&spec).map(|output| output.stdout)
    }

    fn sudo(&self, spec: CommandSpec) -> io::Result<()> {
        self.runner
            .run_checked(&spec.elevated())
            .map(|_| ())
            .map_err(io::Error::other)
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Read a text file, falling back to `sudo cat` when unreadable
    pub fn read_to_string(&self, path: &Path) -> io::Result<String> {
        match fs::read_to_string(path) {
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied
                && self.privilege == Privilege::Sudo =>
            {
                self.runner
                    .run_checked(&CommandSpec::new("cat").path_arg(path).elevated())
                    .map(|output| output.stdout)
                    .map_err(io::Error::other)
            }
            other => other,
        }
    }

    /// Replace a file's contents atomically, keeping its mode if it existed
    pub fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        log::debug!("writing {}", path.display());
        match self.privilege {
            Privilege::Direct => write_atomic(path, contents),
            Privilege::Sudo => self.sudo(
                CommandSpec::new("tee")
                    .path_arg(path)
                    .stdin(contents.to_string()),
            ),
        }
    }

    /// Append text to a file, creating it if needed
    pub fn append(&self, path: &Path, text: &str) -> io::Result<()> {
        log::debug!("appending to {}", path.display());
        match self.privilege {
            Privilege::Direct => {
                let mut file = fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                file.write_all(text.as_bytes())
            }
            Privilege::Sudo => self.sudo(
                CommandSpec::new("tee")
                    .arg("-a")
                    .path_arg(path)
                    .stdin(text.to_string()),
            ),
        }
    }

    pub fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if path.is_dir() {
            return Ok(());
        }
        match self.privilege {
            Privilege::Direct => fs::create_dir_all(path),
            Privilege::Sudo => self.sudo(CommandSpec::new("mkdir").arg("-p").path_arg(path)),
        }
    }

    /// Point `link` at `target`, replacing whatever `link` was
    pub fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        log::debug!("linking {} -> {}", link.display(), target.display());
        match self.privilege {
            Privilege::Direct => {
                if fs::symlink_metadata(link).is_ok() {
                    fs::remove_file(link)?;
                }
                std::os::unix::fs::symlink(target, link)
            }
            Privilege::Sudo => self.sudo(
                CommandSpec::new("ln")
                    .arg("-sfn")
                    .path_arg(target)
                    .path_arg(link),
            ),
        }
    }

    pub fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        match self.privilege {
            Privilege::Direct => fs::set_permissions(path, fs::Permissions::from_mode(mode)),
            Privilege::Sudo => self.sudo(
                CommandSpec::new("chmod")
                    .arg(format!("{mode:o}"))
                    .path_arg(path),
            ),
        }
    }
}

fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mode = fs::metadata(path).map_or(DEFAULT_FILE_MODE, |m| m.permissions().mode());

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), fs::Permissions::from_mode(mode))?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
