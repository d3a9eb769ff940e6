pub mod categories;
pub mod findings;
pub mod scoring;

pub use categories::RiskCategoryKey;
pub use findings::{normalize_findings, score_to_level, Finding, NormalizedFindings};
pub use scoring::{
    classify_risk, classify_scores, compute_overall_score, resolve_overall_score, ScoreInput,
    ScoreSource, ScoreSummary,
};
