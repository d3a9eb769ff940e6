use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Category and overall scores on the canonical 0-10 scale.
pub type Score = Decimal;

/// Category weights in percent. The six category weights sum to 100.
pub type Weight = Decimal;

pub const SCORE_MIN: Score = dec!(0);
pub const SCORE_MAX: Score = dec!(10);

/// Per-category risk level derived from a 0-10 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(s)
    }
}

/// Final verdict for a report. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskClassification {
    Low,
    Medium,
    High,
    Unacceptable,
}

impl RiskClassification {
    pub fn label(&self) -> &'static str {
        match self {
            RiskClassification::Low => "Low",
            RiskClassification::Medium => "Medium",
            RiskClassification::High => "High",
            RiskClassification::Unacceptable => "Unacceptable",
        }
    }

    /// Upper-case verdict as printed in conclusions, e.g. `LOW RISK`.
    pub fn headline(&self) -> String {
        format!("{} RISK", self.label().to_uppercase())
    }
}

impl fmt::Display for RiskClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single piece of evidence backing a finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSource {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

impl EvidenceSource {
    /// Link carried by synthesized sources that point at no real document.
    pub const PLACEHOLDER_LINK: &'static str = "#";

    pub fn placeholder(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        EvidenceSource {
            title: title.into(),
            link: Self::PLACEHOLDER_LINK.to_string(),
            snippet: snippet.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.link.trim() == Self::PLACEHOLDER_LINK
    }
}

/// Clamp a score into [0, 10].
pub fn clamp_score(score: Score) -> Score {
    score.clamp(SCORE_MIN, SCORE_MAX)
}

/// Round to one decimal place, halves away from zero.
pub fn round_score(score: Score) -> Score {
    score.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard output envelope for CLI and binding consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata attached to every envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_score_half_away_from_zero() {
        assert_eq!(round_score(dec!(5.85)), dec!(5.9));
        assert_eq!(round_score(dec!(6.25)), dec!(6.3));
        assert_eq!(round_score(dec!(3.44)), dec!(3.4));
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(dec!(-2)), dec!(0));
        assert_eq!(clamp_score(dec!(12.5)), dec!(10));
        assert_eq!(clamp_score(dec!(4.2)), dec!(4.2));
    }

    #[test]
    fn test_placeholder_source() {
        let src = EvidenceSource::placeholder("Pending assessment", "Nothing yet");
        assert!(src.is_placeholder());
        let real = EvidenceSource {
            title: "KVK extract".into(),
            link: "https://www.kvk.nl/".into(),
            snippet: "Registered".into(),
        };
        assert!(!real.is_placeholder());
    }

    #[test]
    fn test_classification_headline_and_order() {
        assert_eq!(RiskClassification::Low.headline(), "LOW RISK");
        assert_eq!(
            RiskClassification::Unacceptable.headline(),
            "UNACCEPTABLE RISK"
        );
        assert!(RiskClassification::Unacceptable > RiskClassification::High);
        assert!(RiskClassification::Medium > RiskClassification::Low);
    }
}
