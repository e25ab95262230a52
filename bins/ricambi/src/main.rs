//! ricambi - spare-parts inventory search
//!
//! Loads an inventory workbook once and filters it by code, description,
//! location and category, either one query at a time or from an
//! interactive shell.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use ricambi_core::error::exit_codes;
use ricambi_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{categories, export, info, search, shell, Context, FilterArgs, OutputFormat};

/// Search a spare-parts inventory table
#[derive(Parser)]
#[command(name = "ricambi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit log lines as JSON on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Configuration file (defaults to .ricambi.toml or ricambi.toml)
    #[arg(short, long, global = true, env = "RICAMBI_CONFIG")]
    config: Option<String>,

    /// Inventory table, overriding data.source
    #[arg(short, long, global = true, env = "RICAMBI_DATA")]
    data: Option<PathBuf>,

    /// Worksheet to read, overriding data.sheet
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// Substitute table used when the inventory cannot be loaded
    #[arg(long, global = true)]
    fallback: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter the inventory and print one page of results
    Search {
        #[command(flatten)]
        filter: FilterArgs,

        /// Page to show (clamped to the available pages)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Rows per page, overriding display.page_size
        #[arg(long)]
        page_size: Option<usize>,

        /// Assume this terminal width instead of probing
        #[arg(long)]
        width: Option<u16>,
    },

    /// Write every matching row as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file, or "-" for stdout (defaults to export.file_name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the categories present in the inventory
    Categories,

    /// Show the loaded inventory and active settings
    Info {
        /// Include query metrics for this run
        #[arg(long)]
        metrics: bool,
    },

    /// Interactive filtering session
    Shell {
        /// Assume this terminal width instead of probing
        #[arg(long)]
        width: Option<u16>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig::for_verbosity(cli.verbose).with_json(cli.log_json);
    if let Err(e) = ricambi_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let ctx = match Context::new(
        cli.config.as_deref(),
        cli.format,
        cli.data,
        cli.sheet,
        cli.fallback,
    ) {
        Ok(ctx) => ctx,
        Err(e) => return report(&e, cli.format),
    };

    let result = match cli.command {
        Commands::Search {
            filter,
            page,
            page_size,
            width,
        } => search::run(&ctx, &filter, page, page_size, width),
        Commands::Export { filter, output } => export::run(&ctx, &filter, output.as_deref()),
        Commands::Categories => categories::run(&ctx),
        Commands::Info { metrics } => info::run(&ctx, metrics),
        Commands::Shell { width } => shell::run(&ctx, width),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e, cli.format),
    }
}

/// Print an error and map it to an exit status
fn report(err: &anyhow::Error, format: OutputFormat) -> ExitCode {
    let coded = err.downcast_ref::<ricambi_core::Error>();

    if format == OutputFormat::Json {
        let body = match coded {
            Some(e) => serde_json::to_string_pretty(&e.to_report()),
            None => serde_json::to_string_pretty(&serde_json::json!({ "message": err.to_string() })),
        };
        if let Ok(body) = body {
            eprintln!("{}", body);
        }
    } else if let Some(e) = coded {
        eprintln!("{} {}", "Error:".red().bold(), e);
    } else {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
    }

    let code = coded.map_or(exit_codes::FAILURE, |e| exit_codes::for_code(e.code));
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
