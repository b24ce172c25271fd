//! devsite - local web-application environment provisioning
//!
//! Creates a PHP project, its environment file and MySQL database, a TLS
//! certificate, an nginx virtual host and a hosts entry in one invocation.

use clap::Parser;
use clap::error::ErrorKind;
use miette::Diagnostic;

mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod operations;
mod steps;
mod system;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use error::DevsiteError;

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(verbose)
        .init();
}

/// Message, then the diagnostic code and help when the error has them
fn print_error(e: &DevsiteError) {
    eprintln!("Error: {e}");
    if let Some(code) = e.code() {
        eprintln!("  code: {code}");
    }
    if let Some(help) = e.help() {
        eprintln!("  help: {help}");
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(cli.config, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        print_error(&e);
        std::process::exit(1);
    }
}
