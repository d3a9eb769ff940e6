use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::conclusion::assemble_conclusion;
use super::evidence::{build_evidence_locker, EvidenceGroup};
use super::introduction::{introduction, search_keywords};
use crate::assessment::findings::{normalize_findings_with_warnings, Finding};
use crate::assessment::scoring::{classify_risk, resolve_overall_score, ScoreSource};
use crate::company::CompanyInfo;
use crate::investigation::InvestigationResult;
use crate::types::{RiskClassification, Score};

const UNKNOWN_COMPANY: &str = "Unknown Company";
const UNKNOWN_KVK: &str = "Unknown";

/// Complete, immutable risk report for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub company_name: String,
    pub kvk_number: String,
    pub introduction: String,
    pub search_keywords: Vec<String>,
    /// Always six entries, one per category, in fixed order.
    pub findings: Vec<Finding>,
    pub overall_score: Score,
    pub score_source: ScoreSource,
    pub risk_classification: RiskClassification,
    pub conclusion_text: String,
    pub evidence_locker: Vec<EvidenceGroup>,
    pub methodology: String,
    pub assumptions: Vec<String>,
    pub warnings: Vec<String>,
}

pub const METHODOLOGY: &str = "Six-category open-source KYC assessment (geographical 20%, industry 15%, structure 25%, adverse media 15%, sanctions 15%, PEP 10%); weighted 0-10 score with single-category escalation";

/// Build a report from an investigation result and, when known, the company
/// record. Never fails: missing data degrades to documented defaults which
/// are listed in `warnings`.
pub fn assemble_report(raw: &InvestigationResult, company: Option<&CompanyInfo>) -> Report {
    let normalized = normalize_findings_with_warnings(raw);
    let mut warnings = normalized.warnings;
    let findings = normalized.findings;

    let company_name = company
        .map(|c| c.legal_name.trim())
        .filter(|n| !n.is_empty())
        .or_else(|| raw.company_name())
        .unwrap_or(UNKNOWN_COMPANY)
        .to_string();
    if company_name == UNKNOWN_COMPANY {
        warnings.push("Company name unavailable".to_string());
    }

    let kvk_number = company
        .map(|c| c.kvk_number.trim())
        .filter(|k| !k.is_empty())
        .unwrap_or(UNKNOWN_KVK)
        .to_string();

    let (overall_score, score_source) = resolve_overall_score(&findings, raw.final_risk_score());
    let risk_classification = classify_risk(overall_score, &findings);

    let description = company
        .and_then(|c| c.description.as_deref())
        .or_else(|| raw.company_description());

    let conclusion_text = assemble_conclusion(
        &company_name,
        overall_score,
        risk_classification,
        description,
        raw.recommendations(),
    );

    let evidence_locker = build_evidence_locker(&findings);

    let mut assumptions = vec![
        "Category scores use a 0-10 scale; 0-100 inputs are divided by 10".to_string(),
        "Category levels: Low <= 3, Medium <= 7, High above 7".to_string(),
        "Any category scoring 8 or more escalates the report to Unacceptable".to_string(),
    ];
    match score_source {
        ScoreSource::UpstreamOverride => {
            assumptions.push("Overall score supplied by the KYC service".to_string())
        }
        ScoreSource::Computed => {
            assumptions.push("Overall score is the weighted category average".to_string())
        }
    }

    info!(
        company = %company_name,
        shape = raw.shape(),
        overall_score = %overall_score,
        classification = %risk_classification,
        evidence_groups = evidence_locker.len(),
        "report assembled"
    );

    Report {
        introduction: introduction(&company_name, &kvk_number, company),
        search_keywords: search_keywords(&company_name, company),
        company_name,
        kvk_number,
        findings,
        overall_score,
        score_source,
        risk_classification,
        conclusion_text,
        evidence_locker,
        methodology: METHODOLOGY.to_string(),
        assumptions,
        warnings,
    }
}

/// Convenience wrapper for an untyped (possibly absent) payload.
pub fn assemble_report_from_value(raw: Option<&Value>, company: Option<&CompanyInfo>) -> Report {
    assemble_report(&InvestigationResult::from_optional(raw), company)
}
