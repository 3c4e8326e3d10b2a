//! mysql-sqlite-convert CLI - translate MySQL dumps into SQLite form.

use clap::{Parser, Subcommand};
use mysql_sqlite_convert::{check, load, translate, Config, ConvertError, ConvertReport, UnsupportedPolicy};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "mysql-sqlite-convert")]
#[command(about = "Translate MySQL dumps into SQLite scripts or databases")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file (optional; defaults apply without it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Policy for MySQL-only statements: skip or fail
    #[arg(long, value_name = "POLICY")]
    on_unsupported: Option<String>,

    /// Output JSON report to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a dump into a SQLite-compatible SQL script
    Translate {
        /// MySQL dump file to read
        input: PathBuf,

        /// SQL script file to write
        output: PathBuf,
    },

    /// Translate a dump and load it into a SQLite database file
    Load {
        /// MySQL dump file to read
        input: PathBuf,

        /// SQLite database file (created if missing)
        db: PathBuf,
    },

    /// Parse and translate a dump without writing anything
    Check {
        /// MySQL dump file to read
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), ConvertError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format)
        .map_err(|e| ConvertError::Config(e.to_string()))?;

    // Load configuration, then apply flag overrides.
    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => Config::default(),
    };

    if let Some(policy) = &cli.on_unsupported {
        config.translate.on_unsupported = match policy.to_lowercase().as_str() {
            "skip" => UnsupportedPolicy::Skip,
            "fail" => UnsupportedPolicy::Fail,
            other => {
                return Err(ConvertError::Config(format!(
                    "--on-unsupported must be 'skip' or 'fail', got '{}'",
                    other
                )))
            }
        };
    }

    match &cli.command {
        Commands::Translate { input, output } => {
            let report = translate(input, output, &config)?;
            print_report(&cli, "Translation", &report)?;
        }
        Commands::Load { input, db } => {
            let report = load(input, db, &config)?;
            print_report(&cli, "Load", &report)?;
        }
        Commands::Check { input } => {
            let report = check(input, &config)?;
            print_report(&cli, "Check", &report)?;
        }
    }

    Ok(())
}

fn print_report(cli: &Cli, action: &str, report: &ConvertReport) -> Result<(), ConvertError> {
    if cli.output_json {
        println!("{}", report.to_json()?);
    } else {
        println!("{} completed!", action);
        println!("  Run ID: {}", report.run_id);
        println!("  Duration: {:.2}s", report.duration_seconds);
        println!(
            "  Statements: {} read, {} emitted, {} stripped",
            report.statements_read, report.statements_emitted, report.statements_stripped
        );
        println!("  Tables: {}", report.tables_created);
        println!("  Rows: {}", report.rows_inserted);
    }
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
