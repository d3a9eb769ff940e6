use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Weight;

/// The six risk categories every report covers, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategoryKey {
    GeoRisk,
    IndustryRisk,
    StructureRisk,
    AdverseMediaRisk,
    SanctionsRisk,
    PepRisk,
}

impl RiskCategoryKey {
    pub const ALL: [RiskCategoryKey; 6] = [
        RiskCategoryKey::GeoRisk,
        RiskCategoryKey::IndustryRisk,
        RiskCategoryKey::StructureRisk,
        RiskCategoryKey::AdverseMediaRisk,
        RiskCategoryKey::SanctionsRisk,
        RiskCategoryKey::PepRisk,
    ];

    /// Key as it appears in upstream `risk_assessment` objects.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategoryKey::GeoRisk => "geo_risk",
            RiskCategoryKey::IndustryRisk => "industry_risk",
            RiskCategoryKey::StructureRisk => "structure_risk",
            RiskCategoryKey::AdverseMediaRisk => "adverse_media_risk",
            RiskCategoryKey::SanctionsRisk => "sanctions_risk",
            RiskCategoryKey::PepRisk => "pep_risk",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let k = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == k)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RiskCategoryKey::GeoRisk => "Geographical Risk",
            RiskCategoryKey::IndustryRisk => "Industry Risk",
            RiskCategoryKey::StructureRisk => "Structure Risk",
            RiskCategoryKey::AdverseMediaRisk => "Adverse Media Risk",
            RiskCategoryKey::SanctionsRisk => "Sanctions Risk",
            RiskCategoryKey::PepRisk => "PEP Risk",
        }
    }

    /// Weight in percent used by the overall weighted average.
    pub fn weight(self) -> Weight {
        match self {
            RiskCategoryKey::GeoRisk => dec!(20),
            RiskCategoryKey::IndustryRisk => dec!(15),
            RiskCategoryKey::StructureRisk => dec!(25),
            RiskCategoryKey::AdverseMediaRisk => dec!(15),
            RiskCategoryKey::SanctionsRisk => dec!(15),
            RiskCategoryKey::PepRisk => dec!(10),
        }
    }
}

/// Sum of all category weights (always 100).
pub fn total_weight() -> Weight {
    RiskCategoryKey::ALL.iter().map(|k| k.weight()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one_hundred() {
        assert_eq!(total_weight(), dec!(100));
    }

    #[test]
    fn test_fixed_order() {
        let keys: Vec<&str> = RiskCategoryKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "geo_risk",
                "industry_risk",
                "structure_risk",
                "adverse_media_risk",
                "sanctions_risk",
                "pep_risk"
            ]
        );
        let mut sorted = RiskCategoryKey::ALL;
        sorted.sort();
        assert_eq!(sorted, RiskCategoryKey::ALL);
    }

    #[test]
    fn test_from_key() {
        assert_eq!(
            RiskCategoryKey::from_key("Sanctions_Risk "),
            Some(RiskCategoryKey::SanctionsRisk)
        );
        assert_eq!(RiskCategoryKey::from_key("final_risk_score"), None);
    }

    #[test]
    fn test_serde_uses_upstream_keys() {
        let json = serde_json::to_string(&RiskCategoryKey::AdverseMediaRisk).unwrap();
        assert_eq!(json, "\"adverse_media_risk\"");
    }
}
