//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - run: Run command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod run;

pub use completions::CompletionsArgs;
pub use run::{OutputFormat, RunArgs};

/// devsite - local web-application environment provisioning
///
/// Scaffold a PHP project and wire it to MySQL, nginx, TLS and /etc/hosts in one step.
#[derive(Parser, Debug)]
#[command(
    name = "devsite",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Provision a local HTTPS development site in one command",
    long_about = "devsite scaffolds a project, prepares its environment file and database, \
                  issues a TLS certificate, publishes an nginx virtual host and maps the \
                  domain in the hosts file. Every step is skipped when already satisfied.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  devsite run --name blog-app                    \x1b[90m# https://blog-app.local\x1b[0m\n   \
                  devsite run --name shop --domain shop.test     \x1b[90m# Custom domain\x1b[0m\n   \
                  devsite run --name api --php 8.2 --open        \x1b[90m# Other PHP, open browser\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Settings file (defaults to <config dir>/devsite/config.yaml)
    #[arg(long, short = 'c', global = true, env = "DEVSITE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision a project, its database, certificate and virtual host
    Run(RunArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
