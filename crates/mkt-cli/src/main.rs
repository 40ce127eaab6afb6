//! Marketplace seeding CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use mkt_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use mkt_cli::logging::{LogConfig, LogFormat, init_logging};
use mkt_cli::summary::{print_download_summary, print_seed_summary, print_validation};
use mkt_seed::SeedConfig;
use tracing::level_filters::LevelFilter;

mod commands;

use crate::commands::{RunOptions, run_download, run_resources, run_seed, run_validate};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let config = match SeedConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    };
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("error: failed to start async runtime: {error}");
            std::process::exit(1);
        }
    };
    let options = RunOptions {
        config,
        show_progress: cli.log_format != LogFormatArg::Json && io::stderr().is_terminal(),
    };

    let exit_code = match &cli.command {
        Command::Download(args) => match runtime.block_on(run_download(&options, args)) {
            Ok(result) => {
                print_download_summary(&result.marketplace_id, &result.output, &result.counts);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Seed(args) => match runtime.block_on(run_seed(&options, args)) {
            Ok(summary) => {
                print_seed_summary(&summary);
                0
            }
            Err(error) => report_error(&error),
        },
        // Issues are part of a successful validation run.
        Command::Validate(args) => match runtime.block_on(run_validate(&options, args)) {
            Ok(result) => {
                print_validation(&result.source, &result.report, result.report_path.as_deref());
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Resources => match run_resources() {
            Ok(()) => 0,
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
