use napi::Result as NapiResult;
use napi_derive::napi;

use kyc_report_core::assessment::findings::normalize_findings_with_warnings;
use kyc_report_core::assessment::{classify_scores, ScoreInput};
use kyc_report_core::company::CompanyInfo;
use kyc_report_core::investigation::InvestigationResult;
use kyc_report_core::report::{self, DocumentOptions, Report};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Missing, empty or malformed investigation JSON is an absent result, not
/// an error.
fn investigation(raw_json: Option<String>) -> InvestigationResult {
    raw_json
        .as_deref()
        .map(InvestigationResult::from_json_str)
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Report assembly
// ---------------------------------------------------------------------------

#[napi]
pub fn assemble_report(raw_json: Option<String>, company_json: Option<String>) -> NapiResult<String> {
    let raw = investigation(raw_json);
    let company: Option<CompanyInfo> = match company_json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => Some(serde_json::from_str(json).map_err(to_napi_error)?),
        _ => None,
    };
    let output = report::assemble_report(&raw, company.as_ref());
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn normalize_findings(raw_json: Option<String>) -> NapiResult<String> {
    let output = normalize_findings_with_warnings(&investigation(raw_json));
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn classify_risk(input_json: String) -> NapiResult<String> {
    let input: ScoreInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = classify_scores(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Printable document
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize, Default)]
#[serde(default)]
struct DocumentBindingOptions {
    lines_per_page: Option<usize>,
    width: Option<usize>,
    generated_on: Option<chrono::NaiveDate>,
}

#[derive(serde::Serialize)]
struct RenderedDocument {
    file_name: String,
    document: String,
}

#[napi]
pub fn render_document(report_json: String, options_json: Option<String>) -> NapiResult<String> {
    let report: Report = serde_json::from_str(&report_json).map_err(to_napi_error)?;
    let opts: DocumentBindingOptions = match options_json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => serde_json::from_str(json).map_err(to_napi_error)?,
        _ => DocumentBindingOptions::default(),
    };
    let defaults = DocumentOptions::default();
    let options = DocumentOptions {
        lines_per_page: opts.lines_per_page.unwrap_or(defaults.lines_per_page),
        width: opts.width.unwrap_or(defaults.width),
        generated_on: opts.generated_on,
    };
    let output = RenderedDocument {
        file_name: report::document_file_name(&report),
        document: report::render_document(&report, &options),
    };
    serde_json::to_string(&output).map_err(to_napi_error)
}
