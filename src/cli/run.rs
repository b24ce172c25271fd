use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How the final report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Provision with defaults (blog-app.local, PHP 8.3):\n    devsite run --name blog-app\n\n\
                  Custom domain and PHP version:\n    devsite run --name=shop --domain=shop.test --php=8.2\n\n\
                  Re-run against an already scaffolded project:\n    devsite run --name blog-app --reuse-existing\n\n\
                  Machine-readable report:\n    devsite run --name blog-app --format json")]
pub struct RunArgs {
    /// Project name; also the directory and database name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Site domain (defaults to <name>.local)
    #[arg(long, value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// PHP version whose FPM socket serves the site (defaults to 8.3)
    #[arg(long, value_name = "VERSION")]
    pub php: Option<String>,

    /// Directory holding the projects (overrides the settings file)
    #[arg(long, value_name = "DIR", env = "DEVSITE_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Accept an existing scaffolded project instead of failing
    #[arg(long)]
    pub reuse_existing: bool,

    /// Open the site in a browser when done
    #[arg(long)]
    pub open: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Hide progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}
