//! Catalog CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use catalog_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use catalog_cli::commands::{
    Catalog, run_deactivate, run_export, run_import, run_render, run_schema_check, run_template,
    run_validate,
};
use catalog_cli::config::CatalogConfig;
use catalog_cli::logging::{LogConfig, LogFormat, init_logging};
use catalog_cli::summary::{
    print_import_rows, print_import_summary, print_schema_issues, print_templates,
    print_validation,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = CatalogConfig::load(cli.config.as_deref())?;
    let mut catalog = Catalog::open(&cli.catalog, config)?;
    let code = match &cli.command {
        Command::Validate(args) => {
            let report = run_validate(&catalog, args)?;
            print_validation(&report);
            i32::from(!report.is_clean())
        }
        Command::SchemaCheck(args) => {
            let issues = run_schema_check(&catalog, args)?;
            print_schema_issues(&issues);
            i32::from(!issues.is_empty())
        }
        Command::Import(args) => {
            let report = run_import(&mut catalog, args)?;
            let messages = catalog.config().messages();
            for summary in &report.summaries {
                if log_config_level(cli) >= LevelFilter::DEBUG {
                    print_import_rows(summary);
                }
                print_import_summary(
                    summary,
                    catalog.config().import.error_display_limit,
                    messages,
                );
            }
            i32::from(report.failed() > 0)
        }
        Command::Export(args) => {
            let path = run_export(&catalog, args)?;
            println!("Exported: {}", path.display());
            0
        }
        Command::Deactivate(args) => {
            let series = run_deactivate(&mut catalog, args)?;
            println!("Deactivated: {}", series.code);
            0
        }
        Command::Template(args) => {
            let path = run_template(&catalog, args)?;
            println!("Template: {}", path.display());
            0
        }
        Command::Templates => {
            print_templates(catalog.registry());
            0
        }
        Command::Render(args) => {
            let outcome = run_render(&catalog, args)?;
            println!("Data sheet: {}", outcome.path.display());
            i32::from(outcome.has_error)
        }
    };
    Ok(code)
}

fn log_config_level(cli: &Cli) -> LevelFilter {
    match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: log_config_level(cli),
        use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        log_file: cli.log_file.clone(),
        with_ansi: match cli.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
        },
        ..LogConfig::default()
    }
}
