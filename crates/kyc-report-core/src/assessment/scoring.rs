use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::categories::RiskCategoryKey;
use super::findings::{score_to_level, Finding};
use crate::error::KycReportError;
use crate::types::{
    clamp_score, round_score, with_metadata, ComputationOutput, RiskClassification, Score,
};
use crate::KycReportResult;

const UNACCEPTABLE_OVERALL: Score = dec!(7);
const UNACCEPTABLE_SINGLE: Score = dec!(8);
const HIGH_OVERALL: Score = dec!(4);
const HIGH_SINGLE: Score = dec!(7);
const MEDIUM_OVERALL: Score = dec!(2.5);

/// Where the overall score of a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreSource {
    Computed,
    UpstreamOverride,
}

/// Weighted average of the category scores, rounded to one decimal.
///
/// Each finding is weighted by its category weight; with the full set of six
/// categories the weights sum to 100 and the result is a true weighted mean
/// in [0, 10]. An empty slice scores zero.
pub fn compute_overall_score(findings: &[Finding]) -> Score {
    let total_weight: Decimal = findings.iter().map(|f| f.key.weight()).sum();
    if total_weight.is_zero() {
        return Decimal::ZERO;
    }
    let weighted: Decimal = findings.iter().map(|f| f.score * f.key.weight()).sum();
    round_score(weighted / total_weight)
}

/// Bring an upstream `final_risk_score` onto the 0-10 scale. Values above 10
/// are read as the 0-100 scale.
pub fn normalize_upstream_score(value: Decimal) -> Score {
    let scaled = if value > dec!(10) {
        value / dec!(10)
    } else {
        value
    };
    round_score(clamp_score(scaled))
}

/// Overall score for a report: the upstream override when present, otherwise
/// the weighted average.
pub fn resolve_overall_score(
    findings: &[Finding],
    upstream: Option<Decimal>,
) -> (Score, ScoreSource) {
    match upstream {
        Some(value) => {
            let score = normalize_upstream_score(value);
            debug!(upstream = %value, score = %score, "using upstream final risk score");
            (score, ScoreSource::UpstreamOverride)
        }
        None => (compute_overall_score(findings), ScoreSource::Computed),
    }
}

/// Classify the report. A single severe category escalates the verdict no
/// matter how low the weighted average is.
pub fn classify_risk(overall_score: Score, findings: &[Finding]) -> RiskClassification {
    let worst = findings
        .iter()
        .map(|f| f.score)
        .max()
        .unwrap_or(Decimal::ZERO);

    if overall_score > UNACCEPTABLE_OVERALL || worst >= UNACCEPTABLE_SINGLE {
        RiskClassification::Unacceptable
    } else if overall_score > HIGH_OVERALL || worst >= HIGH_SINGLE {
        RiskClassification::High
    } else if overall_score > MEDIUM_OVERALL {
        RiskClassification::Medium
    } else {
        RiskClassification::Low
    }
}

/// Outcome of classifying six bare category scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub findings: Vec<Finding>,
    pub overall_score: Score,
    pub score_source: ScoreSource,
    pub risk_classification: RiskClassification,
}

/// Input for [`classify_scores`]: six category scores in report order and an
/// optional upstream override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub scores: Vec<Score>,
    #[serde(default)]
    pub final_risk_score: Option<Decimal>,
}

/// Score and classify six category scores without a full investigation
/// payload. Scores outside 0-10 are clamped and reported as warnings.
pub fn classify_scores(input: &ScoreInput) -> KycReportResult<ComputationOutput<ScoreSummary>> {
    let start = Instant::now();

    if input.scores.len() != RiskCategoryKey::ALL.len() {
        return Err(KycReportError::InvalidInput {
            field: "scores".into(),
            reason: format!(
                "expected {} category scores, got {}",
                RiskCategoryKey::ALL.len(),
                input.scores.len()
            ),
        });
    }

    let mut warnings = Vec::new();
    let findings: Vec<Finding> = RiskCategoryKey::ALL
        .iter()
        .zip(&input.scores)
        .map(|(&key, &raw)| {
            let score = clamp_score(raw);
            if score != raw {
                warnings.push(format!(
                    "{}: score {} outside 0-10, clamped to {}",
                    key.as_str(),
                    raw.normalize(),
                    score.normalize()
                ));
            }
            Finding {
                key,
                category: key.display_name().to_string(),
                description: format!(
                    "{} assessed with a risk score of {}/10.",
                    key.display_name(),
                    score.normalize()
                ),
                score,
                risk_level: score_to_level(score),
                weight: key.weight(),
                evidence_sources: Vec::new(),
            }
        })
        .collect();

    let (overall_score, score_source) = resolve_overall_score(&findings, input.final_risk_score);
    let risk_classification = classify_risk(overall_score, &findings);

    let summary = ScoreSummary {
        findings,
        overall_score,
        score_source,
        risk_classification,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Weighted six-category KYC risk score (0-10) with single-category escalation",
        warnings,
        elapsed,
        summary,
    ))
}
