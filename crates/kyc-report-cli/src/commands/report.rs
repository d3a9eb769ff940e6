use std::fs;
use std::path::PathBuf;

use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use kyc_report_core::assessment::{classify_scores, ScoreInput};
use kyc_report_core::company::fixtures::fixture_company;
use kyc_report_core::company::CompanyInfo;
use kyc_report_core::investigation::InvestigationResult;
use kyc_report_core::report::{
    assemble_report, document_file_name, render_document, DocumentOptions, Report,
};

use crate::input;

/// Arguments for offline report assembly
#[derive(Args)]
pub struct ReportArgs {
    /// Path to an investigation result JSON file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a company record JSON file
    #[arg(long, conflicts_with = "kvk")]
    pub company: Option<String>,

    /// Use the built-in demo record for this KvK number
    #[arg(long)]
    pub kvk: Option<String>,
}

/// Arguments for document export
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Output path (defaults to `<Company>_Investigation_Report.txt`)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Lines per printed page
    #[arg(long, default_value_t = 56)]
    pub lines_per_page: usize,

    /// Characters per line
    #[arg(long, default_value_t = 90)]
    pub width: usize,

    /// Date printed under the title (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<chrono::NaiveDate>,
}

/// Arguments for score-only classification
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ClassifyArgs {
    /// Six category scores in report order: geo, industry, structure, media, sanctions, pep
    #[arg(long, value_delimiter = ',', required = true)]
    pub scores: Vec<Decimal>,

    /// Upstream final risk score overriding the weighted average
    #[arg(long)]
    pub final_score: Option<Decimal>,
}

fn load_company(args: &ReportArgs) -> Result<Option<CompanyInfo>, Box<dyn std::error::Error>> {
    if let Some(path) = &args.company {
        return Ok(Some(input::file::read_json(path)?));
    }
    match &args.kvk {
        Some(kvk) => fixture_company(kvk)
            .map(Some)
            .ok_or_else(|| format!("No demo record for KvK number '{}'", kvk).into()),
        None => Ok(None),
    }
}

fn build_report(args: &ReportArgs) -> Result<Report, Box<dyn std::error::Error>> {
    let payload = input::investigation_payload(args.input.as_deref())?;
    let company = load_company(args)?;
    let raw = InvestigationResult::from_optional(payload.as_ref());
    Ok(assemble_report(&raw, company.as_ref()))
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let report = build_report(&args)?;
    Ok(serde_json::to_value(report)?)
}

pub fn run_export(args: ExportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let report = build_report(&args.report)?;
    let options = DocumentOptions {
        lines_per_page: args.lines_per_page,
        width: args.width,
        generated_on: args.date,
    };
    let document = render_document(&report, &options);
    let path = args
        .out
        .unwrap_or_else(|| PathBuf::from(document_file_name(&report)));
    fs::write(&path, &document)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;

    Ok(json!({
        "file": path.display().to_string(),
        "pages": document.matches('\u{c}').count() + 1,
        "company_name": report.company_name,
        "overall_score": report.overall_score,
        "risk_classification": report.risk_classification,
    }))
}

pub fn run_classify(args: ClassifyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = ScoreInput {
        scores: args.scores,
        final_risk_score: args.final_score,
    };
    let output = classify_scores(&input)?;
    Ok(serde_json::to_value(output)?)
}
