use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::fields;
use crate::assessment::categories::RiskCategoryKey;

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// An investigation result as delivered by the upstream KYC service,
/// classified once into the shape it actually has.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InvestigationResult {
    /// `{ risk_assessment: { <category>: {...}, final_risk_score? }, ... }`
    Assessed(AssessedResult),
    /// `{ risk_score: 0-100, findings: [..], status? }`
    Flat(FlatResult),
    /// No usable payload (request failed, empty body, unrecognised shape).
    #[default]
    Absent,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssessedResult {
    pub categories: BTreeMap<RiskCategoryKey, RiskCategoryRaw>,
    pub final_risk_score: Option<Decimal>,
    pub recommendations: Vec<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatResult {
    /// Overall score on the upstream 0-100 scale.
    pub risk_score: Decimal,
    pub findings: Vec<String>,
    pub status: Option<String>,
    pub recommendations: Vec<String>,
    pub company_name: Option<String>,
}

/// One category entry of a `risk_assessment` object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RiskCategoryRaw {
    pub label: Option<String>,
    /// `None` when `Risk Score` is absent or not numeric.
    pub score: Option<Decimal>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub sources: Vec<RawSource>,
}

/// One evidence entry before validation; any field may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSource {
    pub source_type: String,
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

impl InvestigationResult {
    /// Classify an arbitrary JSON value. Never fails: anything that is not one
    /// of the two known shapes is `Absent`.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            debug!("investigation payload is not an object");
            return InvestigationResult::Absent;
        };

        if let Some(Value::Object(assessment)) = obj.get("risk_assessment") {
            return InvestigationResult::Assessed(parse_assessed(obj, assessment));
        }

        if let Some(risk_score) = fields::decimal(obj.get("risk_score")) {
            return InvestigationResult::Flat(FlatResult {
                risk_score,
                findings: fields::text_list(obj.get("findings")),
                status: fields::text(obj.get("status")),
                recommendations: fields::text_list(obj.get("recommendations")),
                company_name: fields::text(obj.get("company_name")),
            });
        }

        debug!("investigation payload has neither risk_assessment nor risk_score");
        InvestigationResult::Absent
    }

    pub fn from_optional(value: Option<&Value>) -> Self {
        value.map(Self::from_value).unwrap_or_default()
    }

    /// Parse a raw response body. Malformed JSON degrades to `Absent`.
    pub fn from_json_str(body: &str) -> Self {
        if body.trim().is_empty() {
            return InvestigationResult::Absent;
        }
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                warn!(error = %e, "investigation payload is not valid JSON, treating as absent");
                InvestigationResult::Absent
            }
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            InvestigationResult::Assessed(_) => "assessed",
            InvestigationResult::Flat(_) => "flat",
            InvestigationResult::Absent => "absent",
        }
    }

    pub fn recommendations(&self) -> &[String] {
        match self {
            InvestigationResult::Assessed(a) => &a.recommendations,
            InvestigationResult::Flat(f) => &f.recommendations,
            InvestigationResult::Absent => &[],
        }
    }

    pub fn company_name(&self) -> Option<&str> {
        match self {
            InvestigationResult::Assessed(a) => a.company_name.as_deref(),
            InvestigationResult::Flat(f) => f.company_name.as_deref(),
            InvestigationResult::Absent => None,
        }
    }

    pub fn company_description(&self) -> Option<&str> {
        match self {
            InvestigationResult::Assessed(a) => a.company_description.as_deref(),
            _ => None,
        }
    }

    /// Upstream override for the overall score, as delivered (not rescaled).
    pub fn final_risk_score(&self) -> Option<Decimal> {
        match self {
            InvestigationResult::Assessed(a) => a.final_risk_score,
            _ => None,
        }
    }
}

impl From<&Value> for InvestigationResult {
    fn from(value: &Value) -> Self {
        InvestigationResult::from_value(value)
    }
}

fn parse_assessed(root: &Map<String, Value>, assessment: &Map<String, Value>) -> AssessedResult {
    let mut categories = BTreeMap::new();
    for (key, entry) in assessment {
        if key == "final_risk_score" {
            continue;
        }
        match (RiskCategoryKey::from_key(key), entry) {
            (Some(category), Value::Object(fields)) => {
                categories.insert(category, parse_category(fields));
            }
            (Some(category), _) => {
                debug!(category = category.as_str(), "category entry is not an object, ignoring");
            }
            (None, _) => {
                debug!(key = %key, "unknown risk_assessment key ignored");
            }
        }
    }

    let final_risk_score = fields::decimal(assessment.get("final_risk_score"))
        .or_else(|| fields::decimal(root.get("final_risk_score")));

    AssessedResult {
        categories,
        final_risk_score,
        recommendations: fields::text_list(root.get("recommendations")),
        company_name: fields::text(root.get("company_name")),
        company_description: company_description(root.get("public_web_data")),
    }
}

fn parse_category(entry: &Map<String, Value>) -> RiskCategoryRaw {
    RiskCategoryRaw {
        label: fields::text(entry.get("Risk Category")),
        score: fields::decimal(entry.get("Risk Score")),
        summary: fields::text(entry.get("Summary")),
        description: fields::text(entry.get("Risk Description")),
        sources: parse_sources(entry.get("Source")),
    }
}

/// Flatten `Source` (source type -> list of entries) into one ordered list.
/// A bare list is accepted as a single untyped group.
fn parse_sources(value: Option<&Value>) -> Vec<RawSource> {
    match value {
        Some(Value::Object(groups)) => groups
            .iter()
            .flat_map(|(source_type, items)| parse_source_list(source_type, items))
            .collect(),
        Some(items @ Value::Array(_)) => parse_source_list("Source", items),
        _ => Vec::new(),
    }
}

fn parse_source_list(source_type: &str, items: &Value) -> Vec<RawSource> {
    let Value::Array(items) = items else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.as_object())
        .map(|item| RawSource {
            source_type: source_type.to_string(),
            title: fields::text(item.get("title")),
            link: fields::text(item.get("link")),
            snippet: fields::text(item.get("snippet")),
        })
        .collect()
}

/// `public_web_data` is either a plain description string or an object
/// carrying one under a handful of names.
fn company_description(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(_) => fields::text(value),
        Value::Object(data) => ["company_description", "description", "summary"]
            .iter()
            .find_map(|k| fields::text(data.get(*k))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_assessed_shape() {
        let v = json!({
            "company_name": "Acme B.V.",
            "risk_assessment": {
                "geo_risk": {
                    "Risk Category": "Geographical Risk",
                    "Risk Score": 2,
                    "Summary": "Netherlands only",
                    "Source": {
                        "web": [{"title": "KVK", "link": "https://kvk.nl", "snippet": "Registered"}]
                    }
                },
                "final_risk_score": 3.5,
                "mystery_risk": {"Risk Score": 9}
            },
            "recommendations": ["Proceed"],
            "public_web_data": {"description": "Makes widgets"}
        });
        let result = InvestigationResult::from_value(&v);
        let InvestigationResult::Assessed(a) = &result else {
            panic!("expected assessed shape, got {}", result.shape());
        };
        assert_eq!(a.categories.len(), 1);
        let geo = &a.categories[&RiskCategoryKey::GeoRisk];
        assert_eq!(geo.score, Some(dec!(2)));
        assert_eq!(geo.sources.len(), 1);
        assert_eq!(geo.sources[0].source_type, "web");
        assert_eq!(a.final_risk_score, Some(dec!(3.5)));
        assert_eq!(result.recommendations(), ["Proceed".to_string()]);
        assert_eq!(result.company_name(), Some("Acme B.V."));
        assert_eq!(result.company_description(), Some("Makes widgets"));
    }

    #[test]
    fn test_flat_shape() {
        let v = json!({"risk_score": 65, "findings": ["No negative news"], "status": "completed"});
        match InvestigationResult::from_value(&v) {
            InvestigationResult::Flat(f) => {
                assert_eq!(f.risk_score, dec!(65));
                assert_eq!(f.findings, vec!["No negative news"]);
                assert_eq!(f.status.as_deref(), Some("completed"));
            }
            other => panic!("expected flat shape, got {}", other.shape()),
        }
    }

    #[test]
    fn test_risk_assessment_takes_precedence_over_risk_score() {
        let v = json!({"risk_assessment": {}, "risk_score": 80});
        assert_eq!(InvestigationResult::from_value(&v).shape(), "assessed");
    }

    #[test]
    fn test_absent_shapes() {
        for v in [
            json!(null),
            json!([]),
            json!("error"),
            json!({"detail": "Internal Server Error"}),
            json!({"risk_score": "n/a"}),
            json!({"risk_assessment": "pending"}),
        ] {
            assert_eq!(InvestigationResult::from_value(&v), InvestigationResult::Absent);
        }
        assert_eq!(InvestigationResult::from_optional(None), InvestigationResult::Absent);
        assert_eq!(InvestigationResult::from_json_str("{not json"), InvestigationResult::Absent);
        assert_eq!(InvestigationResult::from_json_str("   "), InvestigationResult::Absent);
    }

    #[test]
    fn test_sources_tolerate_wrong_types() {
        let v = json!({
            "risk_assessment": {
                "pep_risk": {
                    "Risk Score": "high",
                    "Source": [
                        {"title": "Register", "link": "https://example.org"},
                        "stray string",
                        {"link": "https://no-title.example"}
                    ]
                },
                "sanctions_risk": {"Source": {"lists": "not a list"}},
                "industry_risk": 7
            }
        });
        let InvestigationResult::Assessed(a) = InvestigationResult::from_value(&v) else {
            panic!("expected assessed shape");
        };
        let pep = &a.categories[&RiskCategoryKey::PepRisk];
        assert_eq!(pep.score, None);
        assert_eq!(pep.sources.len(), 2);
        assert_eq!(pep.sources[0].source_type, "Source");
        assert_eq!(pep.sources[1].title, None);
        assert!(a.categories[&RiskCategoryKey::SanctionsRisk].sources.is_empty());
        assert!(!a.categories.contains_key(&RiskCategoryKey::IndustryRisk));
    }

    #[test]
    fn test_public_web_data_as_string() {
        let v = json!({"risk_assessment": {}, "public_web_data": "  A family bakery  "});
        assert_eq!(
            InvestigationResult::from_value(&v).company_description(),
            Some("A family bakery")
        );
    }
}
