mod commands;
mod input;
mod output;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::prelude::*;

use commands::report::{ClassifyArgs, ExportArgs, ReportArgs};
use commands::upstream::{CompanyArgs, InvestigateArgs};
use kyc_report_core::config::ClientConfig;

/// Open-source KYC investigation reports
#[derive(Parser)]
#[command(
    name = "kyc",
    version,
    about = "Open-source KYC investigation reports",
    long_about = "A CLI for turning KYC investigation results into risk reports: six \
                  normalized risk categories, a weighted overall score, a verdict, a \
                  conclusion and an evidence locker. Works offline on JSON files or \
                  against the upstream KYC service."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// YAML client configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the KYC service
    #[arg(long, global = true, env = "KYC_API_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, env = "KYC_API_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Never fall back to embedded demo data
    #[arg(long, global = true)]
    no_fixtures: bool,

    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a report from an investigation result (file or stdin)
    Report(ReportArgs),
    /// Write a report as a paginated printable document
    Export(ExportArgs),
    /// Classify six category scores without a full report
    Classify(ClassifyArgs),
    /// Check the upstream KYC service
    Health,
    /// List companies awaiting investigation
    Companies,
    /// Fetch the registry record for a KvK number
    Company(CompanyArgs),
    /// Run a full investigation against the KYC service and build the report
    Investigate(InvestigateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    // clap already resolved the env vars it knows about; the core loader
    // handles the remaining ones.
    let mut config = ClientConfig::load(cli.config.as_deref())?.apply_env();
    if let Some(url) = &cli.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeout_ms = ms;
    }
    if cli.no_fixtures {
        config.use_fixtures = false;
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Report(args) => commands::report::run_report(args),
        Commands::Export(args) => commands::report::run_export(args),
        Commands::Classify(args) => commands::report::run_classify(args),
        Commands::Health => commands::upstream::run_health(&config),
        Commands::Companies => commands::upstream::run_companies(&config),
        Commands::Company(args) => commands::upstream::run_company(args, &config),
        Commands::Investigate(args) => commands::upstream::run_investigate(args, &config),
        Commands::Version => {
            println!("kyc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
