//! CLI argument definitions for the marketplace seeding tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

pub const USERNAME_ENV_VAR: &str = "MKT_SEED_USERNAME";
pub const PASSWORD_ENV_VAR: &str = "MKT_SEED_PASSWORD";

#[derive(Parser)]
#[command(
    name = "mkt-seed",
    version,
    about = "Download, validate, and seed commerce marketplaces",
    long_about = "Download a marketplace into a portable YAML or JSON document, \
                  validate documents offline, and seed them into new or existing \
                  marketplaces."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file (defaults to $MKT_SEED_CONFIG when set).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export a marketplace into a document.
    Download(DownloadArgs),

    /// Validate a document and create its records in a marketplace.
    #[command(alias = "upload")]
    Seed(SeedArgs),

    /// Check a document without contacting a marketplace.
    Validate(ValidateArgs),

    /// List every supported resource type in creation order.
    Resources,
}

/// Portal credentials; either flag may come from the environment.
#[derive(Args)]
pub struct CredentialArgs {
    /// Portal username.
    #[arg(long, short = 'u', env = USERNAME_ENV_VAR)]
    pub username: Option<String>,

    /// Portal password.
    #[arg(long, short = 'p', env = PASSWORD_ENV_VAR, hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Environment of the marketplace (sandbox, staging, production).
    #[arg(long, short = 'e', default_value = "sandbox")]
    pub environment: String,

    /// ID of the marketplace to export.
    #[arg(long = "org-id", short = 'm', value_name = "ID")]
    pub org_id: Option<String>,

    /// Output file; `.json` writes JSON, anything else YAML.
    #[arg(long, short = 'o', value_name = "PATH", default_value = "marketplace.yml")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct SeedArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// ID of the target marketplace.
    #[arg(long = "marketplace-id", short = 'm', value_name = "ID")]
    pub marketplace_id: Option<String>,

    /// Name for a new marketplace. When set the marketplace must not exist yet.
    #[arg(long = "marketplace-name", short = 'n', value_name = "NAME")]
    pub marketplace_name: Option<String>,

    /// Environment of the marketplace (sandbox, staging, production).
    #[arg(long, short = 'e', default_value = "sandbox")]
    pub environment: String,

    /// Document path or http(s) URL.
    #[arg(value_name = "INPUT")]
    pub input: String,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Resolve field schemas from this environment's API description.
    #[arg(long, short = 'e')]
    pub environment: Option<String>,

    /// Also write the issues as a JSON report.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Document path or http(s) URL.
    #[arg(value_name = "INPUT")]
    pub input: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
