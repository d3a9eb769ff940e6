use std::fs;
use std::future::Future;
use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use serde_json::Value;
use tracing::info;

use kyc_report_core::client::{KycClient, ProcessKycRequest};
use kyc_report_core::company::KvkNumber;
use kyc_report_core::config::ClientConfig;
use kyc_report_core::investigation::progress::ProgressPlan;
use kyc_report_core::report::{assemble_report, render_document, DocumentOptions};

/// Arguments for a registry lookup
#[derive(Args)]
pub struct CompanyArgs {
    /// Eight-digit KvK number
    #[arg(long)]
    pub kvk: KvkNumber,
}

/// Arguments for a full investigation
#[derive(Args)]
pub struct InvestigateArgs {
    /// Eight-digit KvK number
    #[arg(long)]
    pub kvk: KvkNumber,

    /// Company home page passed to the investigation
    #[arg(long, default_value = "")]
    pub home_url: String,

    /// Company "about" page passed to the investigation
    #[arg(long, default_value = "")]
    pub about_url: String,

    /// Skip the progress display and its minimum duration
    #[arg(long)]
    pub no_progress: bool,

    /// Also write the printable document to this path
    #[arg(long)]
    pub export: Option<PathBuf>,
}

fn block_on<F: Future>(future: F) -> Result<F::Output, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

pub fn run_health(config: &ClientConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let client = KycClient::new(config)?;
    let health = block_on(client.health())?;
    Ok(serde_json::to_value(health)?)
}

pub fn run_companies(config: &ClientConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let client = KycClient::new(config)?;
    let companies = block_on(client.companies())?;
    Ok(serde_json::to_value(companies)?)
}

pub fn run_company(args: CompanyArgs, config: &ClientConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let client = KycClient::new(config)?;
    let company = block_on(client.company_details(&args.kvk))?;
    Ok(serde_json::to_value(company)?)
}

/// Prints the fixed stage plan to stderr, one activity per tick, so the
/// whole display lasts the configured minimum duration.
async fn show_progress(plan: ProgressPlan) {
    let interval = plan.tick_interval();
    let mut current_stage = None;
    for snapshot in plan.snapshots() {
        tokio::time::sleep(interval).await;
        if current_stage != Some(snapshot.stage_index) {
            current_stage = Some(snapshot.stage_index);
            eprintln!(
                "{} {}",
                format!("[{}/4]", snapshot.stage_index + 1).cyan().bold(),
                snapshot.stage_title.bold()
            );
        }
        if let Some(activity) = snapshot.activity {
            eprintln!("  {} {} ({}%)", "✓".green(), activity, snapshot.percent);
        }
    }
}

pub fn run_investigate(
    args: InvestigateArgs,
    config: &ClientConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let client = KycClient::new(config)?;
    let plan = ProgressPlan::new(config.min_display());
    let show = !args.no_progress && !plan.total_duration().is_zero();

    let investigation = async {
        let company = client.company_details(&args.kvk).await;
        info!(company = %company.legal_name, "investigating");
        let request = ProcessKycRequest {
            company_name: company.legal_name.clone(),
            home_url: args.home_url.clone(),
            about_url: args.about_url.clone(),
        };
        let raw = client.process_kyc(&request).await;
        (company, raw)
    };

    let (company, raw) = block_on(async {
        if show {
            let (result, ()) = tokio::join!(investigation, show_progress(plan));
            result
        } else {
            investigation.await
        }
    })?;

    let report = assemble_report(&raw, Some(&company));

    if let Some(path) = &args.export {
        let document = render_document(&report, &DocumentOptions::default());
        fs::write(path, document)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
        info!(path = %path.display(), "document written");
    }

    Ok(serde_json::to_value(report)?)
}
