use kyc_report_core::assessment::{
    classify_risk, compute_overall_score, normalize_findings, RiskCategoryKey, ScoreSource,
};
use kyc_report_core::company::fixtures::{fixture_company, fixture_investigation};
use kyc_report_core::investigation::InvestigationResult;
use kyc_report_core::report::{assemble_report, assemble_report_from_value, build_evidence_locker};
use kyc_report_core::{RiskClassification, RiskLevel};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;

fn assessed(scores: [i64; 6]) -> InvestigationResult {
    let mut assessment = serde_json::Map::new();
    for (key, score) in RiskCategoryKey::ALL.iter().zip(scores) {
        assessment.insert(key.as_str().to_string(), json!({ "Risk Score": score }));
    }
    InvestigationResult::from_value(&json!({ "risk_assessment": assessment }))
}

// ===========================================================================
// Normalization over every input shape
// ===========================================================================

#[test]
fn test_six_findings_in_fixed_order_for_every_shape() {
    let inputs = vec![
        InvestigationResult::Absent,
        InvestigationResult::from_value(&json!({})),
        InvestigationResult::from_value(&json!({"detail": "Internal Server Error"})),
        InvestigationResult::from_value(&json!({"risk_assessment": {}})),
        InvestigationResult::from_value(&json!({"risk_assessment": {"pep_risk": {"Risk Score": 2}}})),
        InvestigationResult::from_value(&json!({"risk_score": 10, "findings": ["x"]})),
        InvestigationResult::from_value(&json!([1, 2, 3])),
        InvestigationResult::from_json_str("{not json"),
    ];
    for raw in inputs {
        let findings = normalize_findings(&raw);
        let keys: Vec<RiskCategoryKey> = findings.iter().map(|f| f.key).collect();
        assert_eq!(keys, RiskCategoryKey::ALL.to_vec(), "shape {}", raw.shape());
        for f in &findings {
            assert!(f.score >= dec!(0) && f.score <= dec!(10));
        }
    }
}

#[test]
fn test_flat_result_example() {
    let raw = InvestigationResult::from_value(&json!({"risk_score": 65, "findings": []}));
    let findings = normalize_findings(&raw);
    let scores: Vec<_> = findings.iter().map(|f| f.score).collect();
    assert_eq!(
        scores,
        vec![dec!(6), dec!(7), dec!(6), dec!(5), dec!(5), dec!(6)]
    );
    let overall = compute_overall_score(&findings);
    assert_eq!(overall, dec!(5.9));
    assert_eq!(classify_risk(overall, &findings), RiskClassification::High);
}

#[test]
fn test_risk_levels_follow_thresholds() {
    let findings = normalize_findings(&assessed([3, 4, 7, 8, 0, 10]));
    let levels: Vec<RiskLevel> = findings.iter().map(|f| f.risk_level).collect();
    assert_eq!(
        levels,
        vec![
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::Medium,
            RiskLevel::High,
            RiskLevel::Low,
            RiskLevel::High,
        ]
    );
}

// ===========================================================================
// Scoring and classification
// ===========================================================================

#[test]
fn test_single_severe_category_escalates() {
    let findings = normalize_findings(&assessed([9, 4, 4, 0, 0, 0]));
    let overall = compute_overall_score(&findings);
    assert_eq!(overall, dec!(3.4));
    assert_eq!(
        classify_risk(overall, &findings),
        RiskClassification::Unacceptable
    );
}

#[test]
fn test_uniform_low_scores() {
    let findings = normalize_findings(&assessed([2; 6]));
    let overall = compute_overall_score(&findings);
    assert_eq!(overall, dec!(2));
    assert_eq!(classify_risk(overall, &findings), RiskClassification::Low);
}

#[test]
fn test_classification_monotonic_without_override() {
    let findings = normalize_findings(&assessed([1; 6]));
    let mut previous = RiskClassification::Low;
    let mut score = dec!(0);
    while score <= dec!(10) {
        let class = classify_risk(score, &findings);
        assert!(class >= previous, "classification dropped at {}", score);
        previous = class;
        score += dec!(0.1);
    }
    assert_eq!(previous, RiskClassification::Unacceptable);
}

// ===========================================================================
// Report assembly end to end
// ===========================================================================

#[test]
fn test_fixture_reports() {
    let amsterdam = fixture_company("12345678").unwrap();
    let raw = fixture_investigation(&amsterdam.legal_name).unwrap();
    let report = assemble_report_from_value(Some(&raw), Some(&amsterdam));
    assert_eq!(report.overall_score, dec!(1));
    assert_eq!(report.risk_classification, RiskClassification::Low);
    assert!(report.conclusion_text.starts_with(
        "Based on comprehensive open-source investigation, Amsterdam Tech Solutions B.V. presents a LOW RISK profile with a final risk score of 1.0/10."
    ));

    let rotterdam = fixture_company("34567890").unwrap();
    let raw = fixture_investigation(&rotterdam.legal_name).unwrap();
    let report = assemble_report_from_value(Some(&raw), Some(&rotterdam));
    assert_eq!(report.overall_score, dec!(3.7));
    assert_eq!(report.risk_classification, RiskClassification::Medium);
    assert!(report.evidence_locker.is_empty());
    assert_eq!(report.findings[1].risk_level, RiskLevel::Medium);
}

#[test]
fn test_upstream_score_on_hundred_scale() {
    let raw = InvestigationResult::from_value(&json!({
        "risk_assessment": {"geo_risk": {"Risk Score": 2}},
        "final_risk_score": 45
    }));
    let report = assemble_report(&raw, None);
    assert_eq!(report.overall_score, dec!(4.5));
    assert_eq!(report.score_source, ScoreSource::UpstreamOverride);
    assert_eq!(report.risk_classification, RiskClassification::High);
}

#[test]
fn test_evidence_locker_matches_findings() {
    let raw = InvestigationResult::from_value(&json!({
        "risk_assessment": {
            "sanctions_risk": {
                "Risk Score": 1,
                "Source": {
                    "lists": [
                        {"title": "EU list", "link": "https://eu.example"},
                        {"title": "no link"},
                        {"link": "https://no-title.example"}
                    ]
                }
            }
        }
    }));
    let findings = normalize_findings(&raw);
    let locker = build_evidence_locker(&findings);
    assert_eq!(locker.len(), 1);
    assert_eq!(locker[0].key, RiskCategoryKey::SanctionsRisk);
    assert_eq!(locker[0].sources.len(), 1);
    assert_eq!(locker[0].sources[0].snippet, "No snippet available");
}

#[test]
fn test_report_json_is_stable() {
    let raw = json!({
        "risk_assessment": {"structure_risk": {"Risk Score": "4.5", "Summary": "Holding above"}},
        "recommendations": ["Request UBO register extract"]
    });
    let first = serde_json::to_value(assemble_report_from_value(Some(&raw), None)).unwrap();
    let second = serde_json::to_value(assemble_report_from_value(Some(&raw), None)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first["findings"][2]["score"], json!("4.5"));
    assert_eq!(first["findings"].as_array().map(Vec::len), Some(6));
}
