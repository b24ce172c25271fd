//! Access to the machine being provisioned
//!
//! This module handles:
//! - Running external collaborators ([`CommandRunner`])
//! - Privileged file mutation ([`HostFs`])
//! - Opening the finished site in a browser

pub mod browser;
pub mod host_fs;
pub mod process;

#[cfg(test)]
pub mod fake;

pub use host_fs::{HostFs, Privilege};
#[cfg(test)]
pub use process::CommandOutput;
pub use process::{CommandRunner, CommandSpec, SystemRunner};
