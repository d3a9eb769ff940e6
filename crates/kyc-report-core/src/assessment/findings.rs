use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::categories::RiskCategoryKey;
use crate::investigation::raw::{FlatResult, InvestigationResult, RiskCategoryRaw};
use crate::types::{clamp_score, round_score, EvidenceSource, RiskLevel, Score, Weight};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const LOW_LEVEL_MAX: Score = dec!(3);
const MEDIUM_LEVEL_MAX: Score = dec!(7);

/// Score given to a category nobody has assessed yet.
const PENDING_SCORE: Score = dec!(3);

const MISSING_SNIPPET: &str = "No snippet available";

/// Finding text that hints at adverse media coverage in flat results.
const MEDIA_HINTS: &[&str] = &["media", "news", "negative"];

// ---------------------------------------------------------------------------
// Output structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub key: RiskCategoryKey,
    pub category: String,
    pub description: String,
    pub score: Score,
    pub risk_level: RiskLevel,
    pub weight: Weight,
    pub evidence_sources: Vec<EvidenceSource>,
}

/// Six findings in fixed category order, plus a note for every default that
/// had to be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFindings {
    pub findings: Vec<Finding>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Threshold
// ---------------------------------------------------------------------------

/// Map a 0-10 score to a level: `<= 3` Low, `<= 7` Medium, above that High.
pub fn score_to_level(score: Score) -> RiskLevel {
    if score <= LOW_LEVEL_MAX {
        RiskLevel::Low
    } else if score <= MEDIUM_LEVEL_MAX {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

// ---------------------------------------------------------------------------
// Per-shape normalization
// ---------------------------------------------------------------------------

fn finding_from_category(
    key: RiskCategoryKey,
    raw: &RiskCategoryRaw,
    warnings: &mut Vec<String>,
) -> Finding {
    let score = match raw.score {
        Some(s) => {
            let clamped = clamp_score(s);
            if clamped != s {
                warnings.push(format!(
                    "{}: score {} outside 0-10, clamped to {}",
                    key.as_str(),
                    s.normalize(),
                    clamped.normalize()
                ));
            }
            clamped
        }
        None => {
            warnings.push(format!(
                "{}: missing or non-numeric Risk Score, defaulted to 0",
                key.as_str()
            ));
            Decimal::ZERO
        }
    };

    let category = raw
        .label
        .clone()
        .unwrap_or_else(|| key.display_name().to_string());

    let description = raw
        .summary
        .clone()
        .or_else(|| raw.description.clone())
        .unwrap_or_else(|| {
            format!(
                "{} assessed with a risk score of {}/10.",
                key.display_name(),
                score.normalize()
            )
        });

    let mut evidence_sources = Vec::with_capacity(raw.sources.len());
    let mut skipped = 0usize;
    for src in &raw.sources {
        match (&src.title, &src.link) {
            (Some(title), Some(link)) => evidence_sources.push(EvidenceSource {
                title: title.clone(),
                link: link.clone(),
                snippet: src
                    .snippet
                    .clone()
                    .unwrap_or_else(|| MISSING_SNIPPET.to_string()),
            }),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warnings.push(format!(
            "{}: {} evidence source(s) without title or link skipped",
            key.as_str(),
            skipped
        ));
    }

    Finding {
        key,
        category,
        description,
        score,
        risk_level: score_to_level(score),
        weight: key.weight(),
        evidence_sources,
    }
}

/// Per-category skew applied to the single flat score. Adverse media starts
/// two points down and recovers them when the findings mention media.
fn flat_adjustment(key: RiskCategoryKey, media_hint: bool) -> Decimal {
    match key {
        RiskCategoryKey::GeoRisk => dec!(-1),
        RiskCategoryKey::IndustryRisk => dec!(0),
        RiskCategoryKey::StructureRisk => dec!(-1),
        RiskCategoryKey::AdverseMediaRisk => {
            if media_hint {
                dec!(0)
            } else {
                dec!(-2)
            }
        }
        RiskCategoryKey::SanctionsRisk => dec!(-2),
        RiskCategoryKey::PepRisk => dec!(-1),
    }
}

fn has_media_hint(findings: &[String]) -> bool {
    findings.iter().any(|f| {
        let lower = f.to_lowercase();
        MEDIA_HINTS.iter().any(|h| lower.contains(h))
    })
}

/// Base category score for a flat result: the 0-100 score divided by ten and
/// rounded half away from zero to a whole point.
fn flat_base_score(flat: &FlatResult) -> Score {
    (flat.risk_score / dec!(10)).round_dp_with_strategy(
        0,
        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
    )
}

fn finding_from_flat(key: RiskCategoryKey, flat: &FlatResult, media_hint: bool) -> Finding {
    let score = clamp_score(flat_base_score(flat) + flat_adjustment(key, media_hint));
    Finding {
        key,
        category: key.display_name().to_string(),
        description: format!(
            "{} derived from an overall KYC risk score of {}/100: {}/10.",
            key.display_name(),
            round_score(flat.risk_score).normalize(),
            score.normalize()
        ),
        score,
        risk_level: score_to_level(score),
        weight: key.weight(),
        evidence_sources: vec![EvidenceSource::placeholder(
            "KYC processing result (processkyc)",
            format!(
                "Category score derived from the overall risk score returned by the KYC service ({}/100).",
                round_score(flat.risk_score).normalize()
            ),
        )],
    }
}

fn default_finding(key: RiskCategoryKey) -> Finding {
    Finding {
        key,
        category: key.display_name().to_string(),
        description: format!("Assessment pending for {}.", key.display_name()),
        score: PENDING_SCORE,
        risk_level: score_to_level(PENDING_SCORE),
        weight: key.weight(),
        evidence_sources: vec![EvidenceSource::placeholder(
            "Pending assessment",
            "No evidence has been collected for this category yet.",
        )],
    }
}

// ---------------------------------------------------------------------------
// Main public functions
// ---------------------------------------------------------------------------

/// Normalize any investigation result into exactly six findings, one per
/// category in fixed order.
pub fn normalize_findings(raw: &InvestigationResult) -> Vec<Finding> {
    normalize_findings_with_warnings(raw).findings
}

/// Same as [`normalize_findings`], also reporting each default applied.
pub fn normalize_findings_with_warnings(raw: &InvestigationResult) -> NormalizedFindings {
    let mut warnings = Vec::new();

    let findings = match raw {
        InvestigationResult::Assessed(assessed) => RiskCategoryKey::ALL
            .iter()
            .map(|&key| match assessed.categories.get(&key) {
                Some(entry) => finding_from_category(key, entry, &mut warnings),
                None => {
                    warnings.push(format!(
                        "{}: missing from risk assessment, pending default applied",
                        key.as_str()
                    ));
                    default_finding(key)
                }
            })
            .collect(),
        InvestigationResult::Flat(flat) => {
            let media_hint = has_media_hint(&flat.findings);
            debug!(
                risk_score = %flat.risk_score,
                media_hint,
                "deriving category scores from flat result"
            );
            warnings.push(
                "Category scores derived from a single overall risk score; no per-category evidence"
                    .to_string(),
            );
            RiskCategoryKey::ALL
                .iter()
                .map(|&key| finding_from_flat(key, flat, media_hint))
                .collect()
        }
        InvestigationResult::Absent => {
            warnings.push(
                "No investigation result available; all categories pending assessment".to_string(),
            );
            RiskCategoryKey::ALL.iter().map(|&k| default_finding(k)).collect()
        }
    };

    if !warnings.is_empty() {
        warn!(
            shape = raw.shape(),
            count = warnings.len(),
            "defaults applied while normalizing findings"
        );
    }

    NormalizedFindings { findings, warnings }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
